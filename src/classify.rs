//! Classification of matches from a tracked team's point of view.

use tracing::debug;

use crate::error::{MatchStatsError, Result};
use crate::periods::{PeriodScheme, assign_period_label};
use crate::record::{HalfTimeLeader, MatchRecord, Outcome, Venue};

/// Venue of `tracked_team` in `record`.
///
/// # Errors
///
/// Returns [`MatchStatsError::AmbiguousTeam`] if the team is on neither side,
/// or on both.
pub fn classify_venue(record: &MatchRecord, tracked_team: &str) -> Result<Venue> {
    let is_home = record.home_team == tracked_team;
    let is_away = record.away_team == tracked_team;
    match (is_home, is_away) {
        (true, false) => Ok(Venue::Home),
        (false, true) => Ok(Venue::Away),
        _ => Err(MatchStatsError::AmbiguousTeam {
            team: tracked_team.to_string(),
            home: record.home_team.clone(),
            away: record.away_team.clone(),
        }),
    }
}

/// Full-time result for the side playing at `venue`.
pub fn classify_result(record: &MatchRecord, venue: Venue) -> Outcome {
    let (goals_for, goals_against) = goals_for_against(record, venue);
    Outcome::from_goals(goals_for, goals_against)
}

fn goals_for_against(record: &MatchRecord, venue: Venue) -> (u32, u32) {
    match venue {
        Venue::Home => (record.home_goals, record.away_goals),
        Venue::Away => (record.away_goals, record.home_goals),
    }
}

/// A [`MatchRecord`] annotated for the tracked team.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord<'a> {
    pub record: &'a MatchRecord,
    pub venue: Venue,
    pub outcome: Outcome,
    pub period_label: String,
    /// Position of `period_label` in the scheme, for chronological ordering.
    pub period_rank: usize,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl ClassifiedRecord<'_> {
    pub fn opponent(&self) -> &str {
        match self.venue {
            Venue::Home => &self.record.away_team,
            Venue::Away => &self.record.home_team,
        }
    }

    /// `Some(true)` if the tracked team led at half time, `None` when the
    /// half-time state is not recorded.
    pub fn led_at_half_time(&self) -> Option<bool> {
        let leader = self.record.half_time_leader?;
        Some(matches!(
            (leader, self.venue),
            (HalfTimeLeader::Home, Venue::Home) | (HalfTimeLeader::Away, Venue::Away)
        ))
    }

    /// `Some(true)` if the opponent led at half time.
    pub fn trailed_at_half_time(&self) -> Option<bool> {
        let leader = self.record.half_time_leader?;
        Some(matches!(
            (leader, self.venue),
            (HalfTimeLeader::Away, Venue::Home) | (HalfTimeLeader::Home, Venue::Away)
        ))
    }

    pub fn season(&self) -> Option<String> {
        self.record.season_label()
    }
}

/// Classifies matches for one team against one period scheme.
#[derive(Debug, Clone)]
pub struct Classifier<'s> {
    tracked_team: String,
    scheme: &'s PeriodScheme,
}

impl<'s> Classifier<'s> {
    pub fn new(tracked_team: impl Into<String>, scheme: &'s PeriodScheme) -> Self {
        Self {
            tracked_team: tracked_team.into(),
            scheme,
        }
    }

    pub fn tracked_team(&self) -> &str {
        &self.tracked_team
    }

    pub fn scheme(&self) -> &PeriodScheme {
        self.scheme
    }

    /// # Errors
    ///
    /// Fails when the tracked team did not play in `record`.
    pub fn classify<'a>(&self, record: &'a MatchRecord) -> Result<ClassifiedRecord<'a>> {
        let venue = classify_venue(record, &self.tracked_team)?;
        let (goals_for, goals_against) = goals_for_against(record, venue);
        let period_label = assign_period_label(record.date, self.scheme);
        Ok(ClassifiedRecord {
            record,
            venue,
            outcome: classify_result(record, venue),
            period_rank: self.scheme.rank(period_label),
            period_label: period_label.to_string(),
            goals_for,
            goals_against,
        })
    }

    /// Classifies every match the tracked team played in, skipping the rest.
    pub fn classify_all<'a>(&self, records: &'a [MatchRecord]) -> Vec<ClassifiedRecord<'a>> {
        let classified: Vec<_> = records
            .iter()
            .filter(|r| r.involves(&self.tracked_team))
            .filter_map(|r| self.classify(r).ok())
            .collect();

        debug!(
            team = %self.tracked_team,
            total = records.len(),
            classified = classified.len(),
            "Classified matches"
        );
        classified
    }
}
