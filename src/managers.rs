//! Manager tenures from a `;`-separated `Name;From;To;P;W;D;L;win_perc` file.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::{info, warn};

use crate::analyzers::types::Percent;
use crate::analyzers::utility::round1;
use crate::error::{MatchStatsError, Result};
use crate::fetch::read_source;
use crate::parser::parse_date;

#[derive(Debug, Deserialize)]
struct RawTenure {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "To", default)]
    to: Option<String>,
    #[serde(rename = "P", default)]
    played: Option<u32>,
    #[serde(rename = "W", default)]
    wins: Option<u32>,
    #[serde(rename = "D", default)]
    draws: Option<u32>,
    #[serde(rename = "L", default)]
    losses: Option<u32>,
    #[serde(rename = "win_perc", default)]
    win_perc: Option<String>,
}

/// One manager's spell in charge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerTenure {
    pub name: String,
    pub from: NaiveDate,
    /// `None` while the manager is still in charge.
    pub to: Option<NaiveDate>,
    pub days: i64,
    /// `days / 365`, one decimal.
    pub years: f64,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub win_perc: Percent,
}

fn parse_win_perc(raw: Option<&str>) -> Option<f64> {
    raw.map(|v| v.trim().trim_end_matches('%').trim())
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

impl RawTenure {
    fn into_tenure(self, row: u64, reference: NaiveDate) -> Result<ManagerTenure> {
        let invalid = |reason: String| MatchStatsError::InvalidRecord { row, reason };

        let from = parse_date(&self.from)
            .ok_or_else(|| invalid(format!("unreadable start date '{}'", self.from)))?;
        let to = match self.to.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(raw) => Some(
                parse_date(raw).ok_or_else(|| invalid(format!("unreadable end date '{raw}'")))?,
            ),
            None => None,
        };

        let days = (to.unwrap_or(reference) - from).num_days();
        if days < 0 {
            return Err(invalid(format!("tenure of {} ends before it starts", self.name)));
        }

        let wins = self.wins.unwrap_or(0);
        let draws = self.draws.unwrap_or(0);
        let losses = self.losses.unwrap_or(0);
        let played = self
            .played
            .unwrap_or_else(|| wins.saturating_add(draws).saturating_add(losses));
        let computed = Percent::of(wins, played);
        let win_perc = match parse_win_perc(self.win_perc.as_deref()) {
            Some(p) => Percent::from_value(p).unwrap_or_else(|| {
                warn!(row, value = p, "Win percentage out of range; using W / P");
                computed
            }),
            None => computed,
        };

        Ok(ManagerTenure {
            name: self.name.trim().to_string(),
            from,
            to,
            days,
            years: round1(days as f64 / 365.0),
            played,
            wins,
            draws,
            losses,
            win_perc,
        })
    }
}

/// Parses manager rows, ordered by start date. Open-ended tenures run
/// until `reference`. Unreadable rows are skipped with a warning.
pub fn parse_managers<R: Read>(reader: R, reference: NaiveDate) -> Result<Vec<ManagerTenure>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut tenures = Vec::new();
    for (i, result) in rdr.deserialize::<RawTenure>().enumerate() {
        let row = i as u64 + 2;
        match result
            .map_err(MatchStatsError::from)
            .and_then(|raw| raw.into_tenure(row, reference))
        {
            Ok(tenure) => tenures.push(tenure),
            Err(e) => warn!(row, error = %e, "Skipping manager row"),
        }
    }

    tenures.sort_by(|a, b| a.from.cmp(&b.from).then_with(|| a.name.cmp(&b.name)));
    Ok(tenures)
}

/// Reads manager tenures from a path or URL.
pub fn load_managers(source: &str, reference: NaiveDate) -> Result<Vec<ManagerTenure>> {
    let bytes = read_source(source)?;
    let tenures = parse_managers(bytes.as_slice(), reference)?;
    info!(source, managers = tenures.len(), "Manager tenures loaded");
    Ok(tenures)
}
