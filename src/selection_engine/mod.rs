//! Core selection engine — theme weighting, puzzle scoring, and sampling.
//!
//! ## Module overview
//!
//! | Module         | Purpose |
//! |----------------|---------|
//! | `models`       | Puzzle record, rating and distribution types, boundary validation |
//! | `error`        | `SelectionError` |
//! | `config`       | `SelectorConfig` loaded from TOML |
//! | `sampler`      | Weighted single draw shared by both stages |
//! | `theme_model`  | Ratings to theme probabilities |
//! | `scorer`       | Popularity and rating-fit score of one puzzle |
//! | `selector`     | Filter a pool by theme, score, draw, mark used |
//! | `orchestrator` | `get_next_puzzle()` and the config-bound `Selector` |
//! | `pool`         | Lock-guarded pool for concurrent callers |

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod pool;
pub mod sampler;
pub mod scorer;
pub mod selector;
pub mod theme_model;

// Re-export the public API surface so callers can use
// `selection_engine::get_next_puzzle` without reaching into sub-modules.
pub use config::SelectorConfig;
pub use error::SelectionError;
pub use models::{validate_pool, Puzzle, ThemeDistribution, ThemeRatings};
pub use orchestrator::{get_next_puzzle, rng_from_seed, Selector};
pub use pool::SharedPuzzlePool;
pub use sampler::{weighted_choice, weighted_index};
pub use scorer::{compute_puzzle_score, PuzzleScorer};
pub use selector::{pick_puzzle_for_theme, CandidateFilter};
pub use theme_model::{compute_theme_probabilities, ThemeProbabilityModel};
