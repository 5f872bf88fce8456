//! # puzzle_picker
//!
//! Picks the next practice puzzle for a user, biased toward the themes they are
//! weakest in and toward puzzles whose rating matches their skill.
//!
//! ## How it works
//!
//! 1. Turn the user's per-theme ratings into a probability distribution over
//!    themes. Lower-rated themes get more weight, but every theme keeps a
//!    non-zero chance.
//! 2. Draw a theme from that distribution.
//! 3. Score every unused puzzle tagged with the theme by popularity and by how
//!    close its rating is to the user's rating in the puzzle's themes.
//! 4. Draw a puzzle weighted by score, mark it used, and return it.
//!
//! Nothing is persisted here. The caller owns the pool and the ratings; the
//! only write the engine performs is flipping `used` on the puzzle it returns.
//!
//! ## Quick start
//!
//! ```rust
//! use puzzle_picker::{get_next_puzzle, rng_from_seed, Puzzle, ThemeRatings};
//!
//! let ratings: ThemeRatings = [("fork".to_string(), 1200), ("pin".to_string(), 1600)]
//!     .into_iter()
//!     .collect();
//! let mut pool = vec![
//!     Puzzle::new("AMzCl", 1250, 0.9, ["fork"]).unwrap(),
//!     Puzzle::new("B7xQ2", 1580, 0.8, ["pin"]).unwrap(),
//! ];
//!
//! // Seeded for a reproducible pick; pass `None` for OS entropy.
//! let mut rng = rng_from_seed(Some(42));
//! match get_next_puzzle(&ratings, &mut pool, &mut rng).unwrap() {
//!     Some(puzzle) => println!("next: {puzzle}"),
//!     None => println!("nothing left for the drawn theme"),
//! }
//! ```
//!
//! Tuning lives in [`SelectorConfig`]; bind it with [`Selector::new`]. For a
//! pool shared across threads use [`SharedPuzzlePool`].

pub mod catalog;
pub mod selection_engine;

pub use catalog::{category_for_tag, load_pool_json, parse_lichess_csv, pool_to_json, CatalogError};
pub use selection_engine::{
    compute_puzzle_score, compute_theme_probabilities, get_next_puzzle, pick_puzzle_for_theme,
    rng_from_seed, validate_pool, weighted_choice, CandidateFilter, Puzzle, PuzzleScorer,
    SelectionError, Selector, SelectorConfig, SharedPuzzlePool, ThemeDistribution,
    ThemeProbabilityModel, ThemeRatings,
};
