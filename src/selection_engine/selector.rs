//! Puzzle stage: filter the pool by theme, score, draw, mark used.
//!
//! The only write this module performs is setting `used = true` on the one
//! puzzle it returns.

use rand::seq::index;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::selection_engine::error::SelectionError;
use crate::selection_engine::models::{Puzzle, ThemeRatings};
use crate::selection_engine::sampler::weighted_index;
use crate::selection_engine::scorer::PuzzleScorer;

/// How the unused puzzles of a theme are narrowed down before scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CandidateFilter {
    pub rating_window: Option<f64>,
    pub max_candidates: Option<usize>,
}

/// Pick and mark one unused puzzle tagged with `theme`, using default scoring.
///
/// Returns `Ok(None)` when the theme has no unused puzzle or every candidate
/// scores zero.
pub fn pick_puzzle_for_theme<R: Rng + ?Sized>(
    theme: &str,
    pool: &mut [Puzzle],
    ratings: &ThemeRatings,
    rng: &mut R,
) -> Result<Option<Puzzle>, SelectionError> {
    pick_with(theme, pool, ratings, &PuzzleScorer::default(), CandidateFilter::default(), rng)
}

/// Same as [`pick_puzzle_for_theme`] with explicit scoring and narrowing.
pub fn pick_with<R: Rng + ?Sized>(
    theme: &str,
    pool: &mut [Puzzle],
    ratings: &ThemeRatings,
    scorer: &PuzzleScorer,
    filter: CandidateFilter,
    rng: &mut R,
) -> Result<Option<Puzzle>, SelectionError> {
    let user_rating = ratings.get(theme).copied();
    debug!(theme, user_rating = ?user_rating, "picking puzzle for theme");

    // Pool positions, in pool order.
    let candidates: Vec<usize> = pool
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_candidate_for(theme))
        .map(|(i, _)| i)
        .collect();
    debug!(theme, count = candidates.len(), "unused puzzles for theme");

    if candidates.is_empty() {
        warn!(theme, "no unused puzzle for theme");
        return Ok(None);
    }

    let candidates = narrow(pool, candidates, user_rating, filter, rng);
    if let (Some(lo), Some(hi)) = (
        candidates.iter().map(|&i| pool[i].rating).min(),
        candidates.iter().map(|&i| pool[i].rating).max(),
    ) {
        debug!(theme, count = candidates.len(), min_rating = lo, max_rating = hi, "scoring candidates");
    }

    let scores: Vec<f64> = candidates.iter().map(|&i| scorer.score(&pool[i], ratings)).collect();
    if scores.iter().all(|&s| s == 0.0) {
        warn!(theme, count = candidates.len(), "every candidate scored zero");
        return Ok(None);
    }

    let drawn = weighted_index(&scores, rng)?;
    let selected = &mut pool[candidates[drawn]];
    selected.used = true;

    info!(
        theme,
        puzzle = %selected.id,
        rating = selected.rating,
        popularity = selected.popularity,
        score = scores[drawn],
        "selected puzzle"
    );
    Ok(Some(selected.clone()))
}

/// Apply the rating window and candidate cap. Output stays in pool order,
/// except for the closest-rating fallback, which is ordered by distance.
fn narrow<R: Rng + ?Sized>(
    pool: &[Puzzle],
    mut candidates: Vec<usize>,
    user_rating: Option<i32>,
    filter: CandidateFilter,
    rng: &mut R,
) -> Vec<usize> {
    if let (Some(window), Some(user_rating)) = (filter.rating_window, user_rating) {
        let distance = |i: usize| (f64::from(pool[i].rating) - f64::from(user_rating)).abs();
        let in_window: Vec<usize> = candidates.iter().copied().filter(|&i| distance(i) <= window).collect();

        if in_window.is_empty() {
            candidates.sort_by(|&a, &b| distance(a).total_cmp(&distance(b)));
            if let Some(cap) = filter.max_candidates {
                candidates.truncate(cap);
            }
            warn!(
                window,
                user_rating,
                fallback = candidates.len(),
                "no puzzle inside rating window, using closest ratings"
            );
            return candidates;
        }
        candidates = in_window;
    }

    if let Some(cap) = filter.max_candidates {
        if candidates.len() > cap {
            let mut keep = index::sample(rng, candidates.len(), cap).into_vec();
            keep.sort_unstable();
            debug!(from = candidates.len(), kept = cap, "sampled candidate subset");
            candidates = keep.into_iter().map(|k| candidates[k]).collect();
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection_engine::models::validate_pool;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ratings(pairs: &[(&str, i32)]) -> ThemeRatings {
        pairs.iter().map(|(t, r)| (t.to_string(), *r)).collect()
    }

    fn puzzle(id: &str, rating: i32, themes: &[&str]) -> Puzzle {
        Puzzle::new(id, rating, 0.9, themes.iter().copied()).unwrap()
    }

    #[test]
    fn marks_only_the_selected_puzzle() {
        let mut pool = vec![puzzle("a", 1500, &["fork"]), puzzle("b", 1500, &["pin"])];
        let mut rng = StdRng::seed_from_u64(3);
        let picked = pick_puzzle_for_theme("fork", &mut pool, &ratings(&[("fork", 1500)]), &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(picked.id, "a");
        assert!(picked.used);
        assert!(pool[0].used);
        assert!(!pool[1].used);
    }

    #[test]
    fn used_only_pool_is_not_found() {
        let mut pool = vec![puzzle("a", 1500, &["fork"])];
        pool[0].used = true;
        let mut rng = StdRng::seed_from_u64(0);
        let r = pick_puzzle_for_theme("fork", &mut pool, &ratings(&[("fork", 1500)]), &mut rng).unwrap();
        assert!(r.is_none());
    }

    #[test]
    fn unknown_theme_is_not_found() {
        let mut pool = vec![puzzle("a", 1500, &["fork"])];
        let mut rng = StdRng::seed_from_u64(0);
        let r = pick_puzzle_for_theme("pin", &mut pool, &ratings(&[("fork", 1500)]), &mut rng).unwrap();
        assert!(r.is_none());
        assert!(!pool[0].used);
    }

    #[test]
    fn all_zero_scores_are_not_found() {
        // Chosen theme is unrated and so are the puzzles' other themes.
        let mut pool = vec![puzzle("a", 1500, &["skewer"]), puzzle("b", 1400, &["skewer", "pin"])];
        let mut rng = StdRng::seed_from_u64(0);
        let r = pick_puzzle_for_theme("skewer", &mut pool, &ratings(&[("fork", 1500)]), &mut rng).unwrap();
        assert!(r.is_none());
        assert!(pool.iter().all(|p| !p.used));
    }

    #[test]
    fn zero_scored_candidate_is_never_drawn() {
        let r = ratings(&[("fork", 1500)]);
        for seed in 0..50 {
            let mut pool = vec![
                Puzzle::new("dead", 1500, 0.0, ["fork"]).unwrap(),
                Puzzle::new("live", 1500, 0.5, ["fork"]).unwrap(),
            ];
            let mut rng = StdRng::seed_from_u64(seed);
            let p = pick_puzzle_for_theme("fork", &mut pool, &r, &mut rng).unwrap().unwrap();
            assert_eq!(p.id, "live");
        }
    }

    #[test]
    fn rating_window_excludes_far_puzzles() {
        let r = ratings(&[("fork", 1500)]);
        let filter = CandidateFilter { rating_window: Some(150.0), max_candidates: None };
        for seed in 0..30 {
            let mut pool = vec![puzzle("far", 1800, &["fork"]), puzzle("near", 1600, &["fork"])];
            let mut rng = StdRng::seed_from_u64(seed);
            let p = pick_with("fork", &mut pool, &r, &PuzzleScorer::default(), filter, &mut rng)
                .unwrap()
                .unwrap();
            assert_eq!(p.id, "near");
        }
    }

    #[test]
    fn rating_window_falls_back_to_closest() {
        let r = ratings(&[("fork", 1500)]);
        let filter = CandidateFilter { rating_window: Some(50.0), max_candidates: Some(1) };
        let mut pool = vec![
            puzzle("farthest", 2400, &["fork"]),
            puzzle("closest", 1700, &["fork"]),
            puzzle("middle", 1900, &["fork"]),
        ];
        let mut rng = StdRng::seed_from_u64(11);
        let p = pick_with("fork", &mut pool, &r, &PuzzleScorer::default(), filter, &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(p.id, "closest");
    }

    #[test]
    fn rating_window_is_skipped_for_unrated_theme() {
        // "tactic" has no rating, so there is nothing to centre the window on.
        let r = ratings(&[("fork", 1000)]);
        let filter = CandidateFilter { rating_window: Some(50.0), max_candidates: None };
        let mut pool = vec![puzzle("remote", 2600, &["tactic", "fork"])];
        let mut rng = StdRng::seed_from_u64(4);
        let p = pick_with("tactic", &mut pool, &r, &PuzzleScorer::default(), filter, &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(p.id, "remote");
    }

    #[test]
    fn unrated_theme_keeps_pool_order() {
        let pool = vec![
            puzzle("a", 2600, &["tactic", "fork"]),
            puzzle("b", 1500, &["tactic", "fork"]),
            puzzle("c", 2000, &["tactic", "fork"]),
        ];
        let mut rng = StdRng::seed_from_u64(4);
        let kept = narrow(
            &pool,
            vec![0, 1, 2],
            None,
            CandidateFilter { rating_window: Some(50.0), max_candidates: Some(3) },
            &mut rng,
        );
        assert_eq!(kept, vec![0, 1, 2]);
    }

    #[test]
    fn huge_popularity_pool_still_selects() {
        let r = ratings(&[("fork", 1500)]);
        let mut pool = vec![
            Puzzle::new("a", 1500, 1e308, ["fork"]).unwrap(),
            Puzzle::new("b", 1500, 1e308, ["fork"]).unwrap(),
        ];
        validate_pool(&pool).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let first = pick_puzzle_for_theme("fork", &mut pool, &r, &mut rng).unwrap().unwrap();
        let second = pick_puzzle_for_theme("fork", &mut pool, &r, &mut rng).unwrap().unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn candidate_cap_limits_scored_set() {
        let pool: Vec<Puzzle> = (0..20).map(|i| puzzle(&format!("p{i}"), 1500, &["pin"])).collect();
        let mut rng = StdRng::seed_from_u64(5);
        let kept = narrow(
            &pool,
            (0..20).collect(),
            Some(1500),
            CandidateFilter { rating_window: None, max_candidates: Some(4) },
            &mut rng,
        );
        assert_eq!(kept.len(), 4);
        assert!(kept.windows(2).all(|w| w[0] < w[1]), "pool order not preserved: {kept:?}");
    }

    #[test]
    fn seeded_picks_are_reproducible() {
        let r = ratings(&[("fork", 1450)]);
        let run = |seed: u64| -> Vec<String> {
            let mut pool: Vec<Puzzle> =
                (0..10).map(|i| puzzle(&format!("p{i}"), 1400 + i * 10, &["fork"])).collect();
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| pick_puzzle_for_theme("fork", &mut pool, &r, &mut rng).unwrap().unwrap().id)
                .collect()
        };
        assert_eq!(run(77), run(77));
    }
}
