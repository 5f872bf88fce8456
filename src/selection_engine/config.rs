use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::selection_engine::error::SelectionError;

pub const DEFAULT_ALPHA: f64 = 0.8;
pub const DEFAULT_BETA: f64 = 1.0;
pub const DEFAULT_GAMMA: f64 = 1.0;

/// Tuning knobs for both selection stages.
///
/// ```toml
/// alpha = 0.8
/// beta = 1.0
/// gamma = 1.0
/// rating_window = 150.0
/// max_candidates = 50
/// ```
///
/// Every key is optional. With `rating_window` and `max_candidates` unset,
/// every unused puzzle of the chosen theme is scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Theme stage: how strongly weaker themes are favoured over uniform.
    pub alpha: f64,
    /// Puzzle stage: exponent on popularity.
    pub beta: f64,
    /// Puzzle stage: exponent on the rating gap.
    pub gamma: f64,
    /// Only score puzzles within this distance of the user's theme rating.
    pub rating_window: Option<f64>,
    /// Upper bound on how many candidates are scored per request.
    pub max_candidates: Option<usize>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            gamma: DEFAULT_GAMMA,
            rating_window: None,
            max_candidates: None,
        }
    }
}

impl SelectorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, SelectionError> {
        let config: SelectorConfig =
            toml::from_str(text).map_err(|e| SelectionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SelectionError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SelectionError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), ?config, "loaded selector config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SelectionError> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(SelectionError::Config(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        for (name, value) in [("beta", self.beta), ("gamma", self.gamma)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SelectionError::Config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if let Some(window) = self.rating_window {
            if !window.is_finite() || window < 0.0 {
                return Err(SelectionError::Config(format!(
                    "rating_window must be finite and non-negative, got {window}"
                )));
            }
        }
        if self.max_candidates == Some(0) {
            return Err(SelectionError::Config("max_candidates must be at least 1".to_string()));
        }
        Ok(())
    }
}
