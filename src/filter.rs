//! Row selection for extracting a team's matches from a larger results file.

use chrono::NaiveDate;

use crate::record::{MatchRecord, season_end_year};

/// Criteria a match must meet; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub team: Option<String>,
    /// Inclusive season end-year range, e.g. `2015..=2023`.
    pub first_season: Option<i32>,
    pub last_season: Option<i32>,
    /// Inclusive date range.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl MatchFilter {
    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn seasons(mut self, first: Option<i32>, last: Option<i32>) -> Self {
        self.first_season = first;
        self.last_season = last;
        self
    }

    pub fn dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// A season or date bound rejects matches that lack that field.
    pub fn matches(&self, record: &MatchRecord) -> bool {
        if let Some(team) = &self.team {
            if !record.involves(team) {
                return false;
            }
        }

        if self.first_season.is_some() || self.last_season.is_some() {
            let Some(end) = record.season_label().as_deref().and_then(season_end_year) else {
                return false;
            };
            if self.first_season.is_some_and(|f| end < f) || self.last_season.is_some_and(|l| end > l) {
                return false;
            }
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(date) = record.date else {
                return false;
            };
            if self.from.is_some_and(|f| date < f) || self.to.is_some_and(|t| date > t) {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, records: &[MatchRecord]) -> Vec<MatchRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
