//! Theme selection weights.
//!
//! Each theme gets a raw score of `alpha * ((max - rating) + 1) + (1 - alpha)`,
//! normalised over all themes. The strongest theme still scores
//! `alpha + (1 - alpha) = 1.0`, so no theme is ever ruled out; weaker themes
//! just become proportionally more likely.

use tracing::debug;

use crate::selection_engine::config::DEFAULT_ALPHA;
use crate::selection_engine::error::SelectionError;
use crate::selection_engine::models::{ThemeDistribution, ThemeRatings};

/// Maps per-theme ratings to a probability distribution over themes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeProbabilityModel {
    alpha: f64,
}

impl Default for ThemeProbabilityModel {
    fn default() -> Self {
        Self { alpha: DEFAULT_ALPHA }
    }
}

impl ThemeProbabilityModel {
    /// `alpha` weighs the rating gap against a uniform baseline.
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn raw_score(&self, max_rating: i32, rating: i32) -> f64 {
        let gap = f64::from(max_rating) - f64::from(rating);
        self.alpha * (gap + 1.0) + (1.0 - self.alpha)
    }

    pub fn probabilities(&self, ratings: &ThemeRatings) -> Result<ThemeDistribution, SelectionError> {
        let max_rating = ratings
            .values()
            .copied()
            .max()
            .ok_or_else(|| SelectionError::invalid_input("user theme ratings are empty"))?;

        let raw: Vec<(&String, f64)> = ratings
            .iter()
            .map(|(theme, &rating)| (theme, self.raw_score(max_rating, rating)))
            .collect();
        let total: f64 = raw.iter().map(|(_, score)| score).sum();

        let dist: ThemeDistribution = raw
            .into_iter()
            .map(|(theme, score)| (theme.clone(), score / total))
            .collect();

        debug!(max_rating, themes = dist.len(), "computed theme probabilities");
        for (theme, prob) in &dist {
            debug!(theme = %theme, probability = prob, rating = ratings[theme], "theme weight");
        }
        Ok(dist)
    }
}

/// Theme distribution with the default `alpha` of 0.8.
pub fn compute_theme_probabilities(ratings: &ThemeRatings) -> Result<ThemeDistribution, SelectionError> {
    ThemeProbabilityModel::default().probabilities(ratings)
}
