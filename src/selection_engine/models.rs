use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::selection_engine::error::SelectionError;

// ---------------------------------------------------------------------------
// Ratings and distributions
// ---------------------------------------------------------------------------

/// A user's skill rating per theme, e.g. `{"fork": 1200, "pin": 1600}`.
///
/// Ordered so that the theme sequence handed to the sampler is the same on
/// every call, which keeps seeded selections reproducible.
pub type ThemeRatings = BTreeMap<String, i32>;

/// Selection probability per theme. Values sum to 1.0.
pub type ThemeDistribution = BTreeMap<String, f64>;

// ---------------------------------------------------------------------------
// Puzzle record
// ---------------------------------------------------------------------------

/// One practice puzzle as supplied by the puzzle store.
///
/// The engine only ever writes `used`; every other field is read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PuzzleRecord")]
pub struct Puzzle {
    pub id: String,
    pub rating: i32,
    /// Opaque non-negative weight, nominally in `[0, 1]`.
    pub popularity: f64,
    pub themes: Vec<String>,
    pub used: bool,
}

impl Puzzle {
    /// Build an unused puzzle, validating it on the way in.
    pub fn new<I, S>(
        id: impl Into<String>,
        rating: i32,
        popularity: f64,
        themes: I,
    ) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let puzzle = Puzzle {
            id: id.into(),
            rating,
            popularity,
            themes: themes.into_iter().map(Into::into).collect(),
            used: false,
        };
        puzzle.validate()?;
        Ok(puzzle)
    }

    /// Reject records the scorer cannot handle meaningfully.
    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.id.trim().is_empty() {
            return Err(SelectionError::invalid_puzzle(&self.id, "id must not be empty"));
        }
        if !self.popularity.is_finite() {
            return Err(SelectionError::invalid_puzzle(&self.id, "popularity must be finite"));
        }
        if self.popularity < 0.0 {
            return Err(SelectionError::invalid_puzzle(
                &self.id,
                format!("popularity must be non-negative (got {})", self.popularity),
            ));
        }
        Ok(())
    }

    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t == theme)
    }

    /// Unused and tagged with `theme`.
    pub fn is_candidate_for(&self, theme: &str) -> bool {
        !self.used && self.has_theme(theme)
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (rating {}, popularity {:.2}, themes [{}])",
            self.id,
            self.rating,
            self.popularity,
            self.themes.join(", ")
        )
    }
}

/// Validate every record in a pool and reject duplicate ids.
pub fn validate_pool(pool: &[Puzzle]) -> Result<(), SelectionError> {
    let mut seen = HashSet::with_capacity(pool.len());
    for puzzle in pool {
        puzzle.validate()?;
        if !seen.insert(puzzle.id.as_str()) {
            return Err(SelectionError::invalid_puzzle(&puzzle.id, "duplicate id in pool"));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

/// Untrusted JSON shape of a puzzle. Converted into [`Puzzle`] only after
/// validation, so malformed records never reach the scorer.
#[derive(Debug, Deserialize)]
struct PuzzleRecord {
    #[serde(alias = "puzzleID", alias = "puzzleId")]
    id: String,
    #[serde(alias = "lichessRating")]
    rating: i32,
    popularity: f64,
    #[serde(default)]
    themes: Vec<String>,
    #[serde(default)]
    used: bool,
}

impl TryFrom<PuzzleRecord> for Puzzle {
    type Error = SelectionError;

    fn try_from(record: PuzzleRecord) -> Result<Self, Self::Error> {
        let puzzle = Puzzle {
            id: record.id,
            rating: record.rating,
            popularity: record.popularity,
            themes: record.themes,
            used: record.used,
        };
        puzzle.validate()?;
        Ok(puzzle)
    }
}
