//! Error type shared by the loader, classifier and configuration layers.

use std::path::PathBuf;

/// Errors surfaced by the library.
///
/// Empty aggregation groups are not errors; they produce
/// [`Percent::NO_DATA`](crate::analyzers::types::Percent::NO_DATA) instead.
#[derive(Debug, thiserror::Error)]
pub enum MatchStatsError {
    #[error("input not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("team '{team}' played in neither side of {home} vs {away}")]
    AmbiguousTeam {
        team: String,
        home: String,
        away: String,
    },

    #[error("invalid period scheme: {reason}")]
    InvalidPeriods { reason: String },

    #[error("invalid record at row {row}: {reason}")]
    InvalidRecord { row: u64, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MatchStatsError>;
