use thiserror::Error;
use tracing::debug;

use crate::selection_engine::{validate_pool, Puzzle, SelectionError};

/// Errors raised while reading puzzle data handed over by the puzzle store.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("bad header: {0}")]
    Header(String),

    #[error("line {line}: {reason}")]
    Row { line: usize, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Map a Lichess theme tag to the category it is practised under.
///
/// Length tags (`short`, `long`, `veryLong`) and tags with no category
/// return `None`.
pub fn category_for_tag(tag: &str) -> Option<&'static str> {
    let category = match tag.trim().to_ascii_lowercase().as_str() {
        "crushing" => "Crushing",
        "advantage" => "Advantage",
        "mate" | "matein1" | "matein2" | "matein3" | "matein4" | "matein5" | "backrankmate" => "Mate",
        "fork" => "Fork",
        "pin" => "Pin",
        "skewer" => "Skewer",
        "hangingpiece" => "Hanging Piece",
        "trappedpiece" => "Trapped Piece",
        "exposedking" => "Exposed King",
        "middlegame" => "Middlegame",
        "endgame" => "Endgame",
        "pawnendgame" => "Pawn Endgame",
        "rookendgame" => "Rook Endgame",
        "master" | "mastergame" => "Master Game",
        _ => return None,
    };
    Some(category)
}

const COLUMNS: [&str; 10] = [
    "PuzzleId",
    "FEN",
    "Moves",
    "Rating",
    "RatingDeviation",
    "Popularity",
    "NbPlays",
    "Themes",
    "GameUrl",
    "OpeningTags",
];
// OpeningTags may be absent.
const REQUIRED_COLUMNS: usize = 9;

/// Parse a Lichess puzzle export into unused puzzles.
///
/// Themes are mapped through [`category_for_tag`] and deduplicated.
/// Popularity is rescaled from the -100..=100 vote percentage to `[0, 1]`,
/// with net-negative puzzles clamped to zero.
pub fn parse_lichess_csv(text: &str) -> Result<Vec<Puzzle>, CatalogError> {
    let mut lines = text.lines().enumerate();
    let header = lines
        .next()
        .map(|(_, l)| l.trim())
        .ok_or_else(|| CatalogError::Header("input is empty".to_string()))?;
    let names: Vec<&str> = header.split(',').map(str::trim).collect();
    if names.len() < REQUIRED_COLUMNS || names[..REQUIRED_COLUMNS] != COLUMNS[..REQUIRED_COLUMNS] {
        return Err(CatalogError::Header(format!("expected {}", COLUMNS.join(","))));
    }

    let mut puzzles = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        puzzles.push(parse_row(line, line_no)?);
    }

    validate_pool(&puzzles)?;
    debug!(count = puzzles.len(), "parsed puzzle export");
    Ok(puzzles)
}

fn parse_row(line: &str, line_no: usize) -> Result<Puzzle, CatalogError> {
    let row_err = |reason: String| CatalogError::Row { line: line_no, reason };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < REQUIRED_COLUMNS {
        return Err(row_err(format!(
            "expected at least {REQUIRED_COLUMNS} columns, found {}",
            fields.len()
        )));
    }

    let rating: i32 = fields[3]
        .parse()
        .map_err(|_| row_err(format!("invalid rating '{}'", fields[3])))?;
    let popularity: f64 = fields[5]
        .parse()
        .map_err(|_| row_err(format!("invalid popularity '{}'", fields[5])))?;

    let mut themes: Vec<String> = Vec::new();
    for category in fields[7].split_whitespace().filter_map(category_for_tag) {
        if !themes.iter().any(|t| t == category) {
            themes.push(category.to_string());
        }
    }

    Puzzle::new(fields[0], rating, (popularity / 100.0).max(0.0), themes)
        .map_err(|e| row_err(e.to_string()))
}

/// Load a pool from JSON, rejecting invalid or duplicate records.
pub fn load_pool_json(text: &str) -> Result<Vec<Puzzle>, CatalogError> {
    let puzzles: Vec<Puzzle> = serde_json::from_str(text)?;
    validate_pool(&puzzles)?;
    Ok(puzzles)
}

/// Serialize a pool, used flags included, so the store can persist them.
pub fn pool_to_json(pool: &[Puzzle]) -> Result<String, CatalogError> {
    Ok(serde_json::to_string_pretty(pool)?)
}
