//! Data types produced by the aggregation pipeline.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::analyzers::utility::{ratio, round1};
use crate::record::Outcome;

/// A percentage in `[0, 100]`, or "no data" when the underlying group was empty.
///
/// Displays and serializes rounded to one decimal; `N/A` / `null` when empty.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percent(Option<f64>);

impl Percent {
    pub const NO_DATA: Percent = Percent(None);

    /// `part / total * 100`, or [`Percent::NO_DATA`] when `total` is zero.
    pub fn of(part: u32, total: u32) -> Self {
        if total == 0 {
            Self::NO_DATA
        } else {
            Percent(Some(ratio(part, total) * 100.0))
        }
    }

    /// Wraps a percentage that was computed elsewhere; `None` unless the
    /// value lies in `[0, 100]`.
    pub fn from_value(value: f64) -> Option<Self> {
        (0.0..=100.0).contains(&value).then_some(Percent(Some(value)))
    }

    /// Unrounded value.
    pub fn value(self) -> Option<f64> {
        self.0
    }

    pub fn rounded(self) -> Option<f64> {
        self.0.map(round1)
    }

    pub fn is_no_data(self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rounded() {
            Some(v) => write!(f, "{v:.1}"),
            None => f.write_str("N/A"),
        }
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rounded().serialize(serializer)
    }
}

/// Dimensions records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Venue,
    Period,
    Season,
    Year,
    Opponent,
    Outcome,
}

impl GroupKey {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupKey::Venue => "venue",
            GroupKey::Period => "period",
            GroupKey::Season => "season",
            GroupKey::Year => "year",
            GroupKey::Opponent => "opponent",
            GroupKey::Outcome => "outcome",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "venue" => Ok(GroupKey::Venue),
            "period" | "covid" => Ok(GroupKey::Period),
            "season" => Ok(GroupKey::Season),
            "year" => Ok(GroupKey::Year),
            "opponent" => Ok(GroupKey::Opponent),
            "outcome" | "result" => Ok(GroupKey::Outcome),
            other => Err(format!(
                "unknown group key '{other}' (expected venue, period, season, year, opponent or outcome)"
            )),
        }
    }
}

/// Which half-time scenario a rate measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateKind {
    /// Led at half time and won.
    Conversion,
    /// Trailed at half time and won.
    Comeback,
}

impl FromStr for RateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conversion" => Ok(RateKind::Conversion),
            "comeback" | "remontada" => Ok(RateKind::Comeback),
            other => Err(format!(
                "unknown rate '{other}' (expected conversion or comeback)"
            )),
        }
    }
}

/// Running win/draw/loss and goal counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome, goals_for: u32, goals_against: u32) {
        self.played = self.played.saturating_add(1);
        let count = match outcome {
            Outcome::Win => &mut self.wins,
            Outcome::Draw => &mut self.draws,
            Outcome::Loss => &mut self.losses,
        };
        *count = count.saturating_add(1);
        self.goals_for = self.goals_for.saturating_add(goals_for);
        self.goals_against = self.goals_against.saturating_add(goals_against);
    }

    pub fn points(&self) -> u32 {
        self.wins
            .saturating_mul(Outcome::Win.points())
            .saturating_add(self.draws.saturating_mul(Outcome::Draw.points()))
    }

    pub fn win_percentage(&self) -> Percent {
        Percent::of(self.wins, self.played)
    }

    pub fn avg_goals_for(&self) -> Option<f64> {
        (self.played > 0).then(|| ratio(self.goals_for, self.played))
    }
}

/// Aggregate statistics for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub group_key: Vec<String>,
    pub match_count: u32,
    pub win_count: u32,
    pub draw_count: u32,
    pub loss_count: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    /// `win_count / match_count`; NaN when the group is empty.
    pub win_rate: f64,
}

impl SummaryRow {
    pub fn from_tally(group_key: Vec<String>, tally: &Tally) -> Self {
        Self {
            group_key,
            match_count: tally.played,
            win_count: tally.wins,
            draw_count: tally.draws,
            loss_count: tally.losses,
            goals_for: tally.goals_for,
            goals_against: tally.goals_against,
            points: tally.points(),
            win_rate: ratio(tally.wins, tally.played),
        }
    }

    pub fn win_percentage(&self) -> Percent {
        Percent::of(self.win_count, self.match_count)
    }

    pub fn points_per_game(&self) -> Option<f64> {
        (self.match_count > 0).then(|| ratio(self.points, self.match_count))
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

/// Opportunities and successes behind a conversion or comeback rate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct RateStat {
    pub opportunities: u32,
    pub successes: u32,
    pub rate: Percent,
}

impl RateStat {
    pub fn from_counts(opportunities: u32, successes: u32) -> Self {
        Self {
            opportunities,
            successes,
            rate: Percent::of(successes, opportunities),
        }
    }

    pub fn record(&mut self, success: bool) {
        self.opportunities += 1;
        if success {
            self.successes += 1;
        }
        self.rate = Percent::of(self.successes, self.opportunities);
    }
}

/// A conversion or comeback rate for one group of the tracked team's matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRow {
    pub group_key: Vec<String>,
    #[serde(flatten)]
    pub stat: RateStat,
}

/// A conversion or comeback rate for one team across the whole league.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRate {
    pub team: String,
    #[serde(flatten)]
    pub stat: RateStat,
}

/// Home and away records of one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueSplit {
    pub team: String,
    pub home: Tally,
    pub away: Tally,
}

/// Per-match averages for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub group_key: Vec<String>,
    pub match_count: u32,
    pub avg_total_goals: Option<f64>,
    pub total_goals_stddev: Option<f64>,
    pub avg_win_margin: Option<f64>,
    pub avg_total_shots: Option<f64>,
    pub avg_total_fouls: Option<f64>,
    pub avg_yellow_cards: Option<f64>,
    pub avg_red_cards: Option<f64>,
    /// Goals per shot over the matches with both shot counts known.
    pub shot_conversion: Percent,
}
