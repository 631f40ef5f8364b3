//! Runtime configuration: period schemes and environment defaults.

use serde::Deserialize;
use std::path::Path;

use crate::error::{MatchStatsError, Result};
use crate::periods::{BoundaryRule, Period, PeriodScheme};

/// Env var naming the default tracked team.
pub const TEAM_ENV: &str = "MATCH_STATS_TEAM";
/// Env var pointing at a period-scheme JSON file.
pub const PERIODS_ENV: &str = "MATCH_STATS_PERIODS";

/// Period scheme as stored on disk:
/// ```json
/// {
///   "rule": "exclusive",
///   "periods": [
///     { "label": "Pre", "until": "2020-03-01" },
///     { "label": "Post" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PeriodConfig {
    #[serde(default)]
    pub rule: BoundaryRule,
    pub periods: Vec<Period>,
}

impl PeriodConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MatchStatsError::MissingInput {
                path: path.to_path_buf(),
            },
            _ => MatchStatsError::Io(e),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validates the periods into a [`PeriodScheme`].
    pub fn into_scheme(self) -> Result<PeriodScheme> {
        PeriodScheme::new(self.periods, self.rule)
    }
}

/// The scheme named by `path`, else by [`PERIODS_ENV`], else the COVID default.
pub fn resolve_scheme(path: Option<&Path>) -> Result<PeriodScheme> {
    let from_env = std::env::var(PERIODS_ENV).ok().filter(|p| !p.is_empty());
    match path.map(Path::to_path_buf).or(from_env.map(Into::into)) {
        Some(path) => PeriodConfig::load(&path)?.into_scheme(),
        None => Ok(PeriodScheme::covid()),
    }
}

/// `explicit` if given, else [`TEAM_ENV`].
pub fn resolve_team(explicit: Option<String>) -> Option<String> {
    explicit
        .or_else(|| std::env::var(TEAM_ENV).ok())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
