//! A short practice session against a small in-memory pool.
//!
//! Run with: `cargo run --example session`
//!
//! Set `RUST_LOG=puzzle_picker=debug` to see theme probabilities and the score
//! breakdown of every candidate.
//!
//! ## What it shows
//!
//! - The theme distribution for a user who is weak at forks and strong at
//!   capturing defenders.
//! - Eight consecutive picks from a seeded RNG, so the output is reproducible.
//!   Puzzles are marked used and never repeat.
//! - A selector tuned through TOML to only consider puzzles within 150 points
//!   of the user's rating.

use puzzle_picker::{
    compute_theme_probabilities, get_next_puzzle, rng_from_seed, Puzzle, Selector, SelectorConfig,
    ThemeRatings,
};
use tracing_subscriber::EnvFilter;

fn demo_pool() -> Vec<Puzzle> {
    let raw: [(&str, i32, f64, &[&str]); 10] = [
        ("AMzCl", 2354, 1.00, &["kingsideAttack"]),
        ("k1Fw8", 1250, 0.80, &["kingsideAttack"]),
        ("q9Lpe", 1500, 0.60, &["kingsideAttack", "fork"]),
        ("r2Dd0", 1180, 0.92, &["fork"]),
        ("t7Hc3", 1320, 0.75, &["fork"]),
        ("u0Pz1", 1410, 0.88, &["deflection"]),
        ("v5Qm6", 1700, 0.95, &["capturingDefender"]),
        ("w3Xy2", 1150, 0.70, &["quietMove"]),
        ("x8Nn4", 1390, 0.83, &["discoveredAttack"]),
        ("y6Bb9", 1230, 0.66, &["quietMove", "deflection"]),
    ];
    raw.into_iter()
        .filter_map(|(id, rating, pop, themes)| Puzzle::new(id, rating, pop, themes.iter().copied()).ok())
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ratings: ThemeRatings = [
        ("capturingDefender", 1666),
        ("discoveredAttack", 1398),
        ("deflection", 1333),
        ("quietMove", 1180),
        ("fork", 1200),
        ("kingsideAttack", 1200),
    ]
    .into_iter()
    .map(|(t, r)| (t.to_string(), r))
    .collect();

    // ── Theme distribution ─────────────────────────────────────────────────
    println!();
    println!("══ Theme probabilities ══");
    let dist = match compute_theme_probabilities(&ratings) {
        Ok(dist) => dist,
        Err(e) => {
            eprintln!("error: {e}");
            return;
        }
    };
    for (theme, p) in &dist {
        println!("  {:<18} rating {:>4}  p = {:.3}", theme, ratings[theme], p);
    }

    // ── Default selection ──────────────────────────────────────────────────
    println!();
    println!("══ Eight picks, seed 42 ══");
    let mut pool = demo_pool();
    let mut rng = rng_from_seed(Some(42));
    for n in 1..=8 {
        match get_next_puzzle(&ratings, &mut pool, &mut rng) {
            Ok(Some(p)) => println!("  {n}. {p}"),
            Ok(None) => println!("  {n}. (drawn theme has nothing left)"),
            Err(e) => println!("  {n}. error: {e}"),
        }
    }
    let left = pool.iter().filter(|p| !p.used).count();
    println!("  {left} of {} puzzles still unused", pool.len());

    // ── Tuned selection ────────────────────────────────────────────────────
    println!();
    println!("══ Rating window ±150 ══");
    let selector = SelectorConfig::from_toml_str("rating_window = 150.0\nmax_candidates = 50\n")
        .and_then(|config| Selector::new(&config));
    let selector = match selector {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return;
        }
    };
    let mut pool = demo_pool();
    let mut rng = rng_from_seed(Some(7));
    for n in 1..=4 {
        match selector.next_puzzle(&ratings, &mut pool, &mut rng) {
            Ok(Some(p)) => println!("  {n}. {p}"),
            Ok(None) => println!("  {n}. (drawn theme has nothing left)"),
            Err(e) => println!("  {n}. error: {e}"),
        }
    }
    println!();
}
