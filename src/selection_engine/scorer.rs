//! Puzzle desirability.
//!
//! `score = popularity^beta * 1 / (1 + |rating - mean_theme_rating|^gamma)`
//!
//! The mean is taken over the puzzle's themes the user has a rating for. A
//! puzzle with no rated theme scores exactly `0.0`.

use tracing::{debug, warn};

use crate::selection_engine::config::{DEFAULT_BETA, DEFAULT_GAMMA};
use crate::selection_engine::models::{Puzzle, ThemeRatings};

/// Scores puzzles with fixed popularity and rating-gap exponents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PuzzleScorer {
    beta: f64,
    gamma: f64,
}

impl Default for PuzzleScorer {
    fn default() -> Self {
        Self::new(DEFAULT_BETA, DEFAULT_GAMMA)
    }
}

impl PuzzleScorer {
    pub fn new(beta: f64, gamma: f64) -> Self {
        Self { beta, gamma }
    }

    pub fn score(&self, puzzle: &Puzzle, ratings: &ThemeRatings) -> f64 {
        compute_puzzle_score(puzzle, ratings, self.beta, self.gamma)
    }
}

/// Mean user rating over the puzzle's rated themes, if any are rated.
pub fn user_rating_for(puzzle: &Puzzle, ratings: &ThemeRatings) -> Option<f64> {
    let rated: Vec<f64> = puzzle
        .themes
        .iter()
        .filter_map(|t| ratings.get(t))
        .map(|&r| f64::from(r))
        .collect();
    if rated.is_empty() {
        return None;
    }
    Some(rated.iter().sum::<f64>() / rated.len() as f64)
}

pub fn compute_puzzle_score(puzzle: &Puzzle, ratings: &ThemeRatings, beta: f64, gamma: f64) -> f64 {
    let Some(user_rating) = user_rating_for(puzzle, ratings) else {
        warn!(puzzle = %puzzle.id, themes = ?puzzle.themes, "puzzle has no themes the user is rated in");
        return 0.0;
    };

    let diff = (f64::from(puzzle.rating) - user_rating).abs();
    let popularity_component = puzzle.popularity.powf(beta);
    let rating_penalty = 1.0 / (1.0 + diff.powf(gamma));
    let score = popularity_component * rating_penalty;
    if !score.is_finite() {
        warn!(
            puzzle = %puzzle.id,
            popularity_component,
            rating_penalty,
            "score is not finite, treating puzzle as unselectable"
        );
        return 0.0;
    }

    debug!(
        puzzle = %puzzle.id,
        rating = puzzle.rating,
        user_rating,
        diff,
        popularity = puzzle.popularity,
        popularity_component,
        rating_penalty,
        score,
        "scored puzzle"
    );
    score
}
