use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::selection_engine::{
    config::SelectorConfig,
    error::SelectionError,
    models::{Puzzle, ThemeDistribution, ThemeRatings},
    sampler::weighted_choice,
    scorer::PuzzleScorer,
    selector::{pick_with, CandidateFilter},
    theme_model::ThemeProbabilityModel,
};

/// Seeded generator for reproducible runs, or OS entropy when `seed` is `None`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    }
}

/// Both selection stages with their tuning bound at construction.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    themes: ThemeProbabilityModel,
    scorer: PuzzleScorer,
    filter: CandidateFilter,
}

impl Selector {
    pub fn new(config: &SelectorConfig) -> Result<Self, SelectionError> {
        config.validate()?;
        Ok(Self {
            themes: ThemeProbabilityModel::new(config.alpha),
            scorer: PuzzleScorer::new(config.beta, config.gamma),
            filter: CandidateFilter {
                rating_window: config.rating_window,
                max_candidates: config.max_candidates,
            },
        })
    }

    pub fn theme_probabilities(&self, ratings: &ThemeRatings) -> Result<ThemeDistribution, SelectionError> {
        self.themes.probabilities(ratings)
    }

    pub fn score(&self, puzzle: &Puzzle, ratings: &ThemeRatings) -> f64 {
        self.scorer.score(puzzle, ratings)
    }

    /// Draw a theme from the rating-derived distribution.
    pub fn pick_theme<R: Rng + ?Sized>(
        &self,
        ratings: &ThemeRatings,
        rng: &mut R,
    ) -> Result<String, SelectionError> {
        let dist = self.theme_probabilities(ratings)?;
        let (themes, weights): (Vec<&String>, Vec<f64>) = dist.iter().map(|(t, &p)| (t, p)).unzip();
        let theme = weighted_choice(&themes, &weights, rng)?;
        info!(theme = %theme, probability = dist[*theme], "selected theme");
        Ok((*theme).clone())
    }

    pub fn pick_for_theme<R: Rng + ?Sized>(
        &self,
        theme: &str,
        pool: &mut [Puzzle],
        ratings: &ThemeRatings,
        rng: &mut R,
    ) -> Result<Option<Puzzle>, SelectionError> {
        pick_with(theme, pool, ratings, &self.scorer, self.filter, rng)
    }

    /// Pick a theme, then a puzzle within it. The returned puzzle is already
    /// marked used in `pool`.
    pub fn next_puzzle<R: Rng + ?Sized>(
        &self,
        ratings: &ThemeRatings,
        pool: &mut [Puzzle],
        rng: &mut R,
    ) -> Result<Option<Puzzle>, SelectionError> {
        info!(themes = ratings.len(), pool = pool.len(), "starting puzzle selection");
        let theme = self.pick_theme(ratings, rng)?;
        self.pick_for_theme(&theme, pool, ratings, rng)
    }
}

/// Select the next puzzle with default tuning.
///
/// `Ok(None)` means the drawn theme had nothing selectable; callers decide
/// whether to retry or report an empty pool.
pub fn get_next_puzzle<R: Rng + ?Sized>(
    ratings: &ThemeRatings,
    pool: &mut [Puzzle],
    rng: &mut R,
) -> Result<Option<Puzzle>, SelectionError> {
    Selector::default().next_puzzle(ratings, pool, rng)
}
