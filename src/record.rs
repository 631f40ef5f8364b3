//! Core match data types.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side was ahead at half time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalfTimeLeader {
    Home,
    Away,
    Level,
}

impl HalfTimeLeader {
    /// Parses the single-letter `H` / `A` / `D` codes used in results exports.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "H" | "h" => Some(HalfTimeLeader::Home),
            "A" | "a" => Some(HalfTimeLeader::Away),
            "D" | "d" => Some(HalfTimeLeader::Level),
            _ => None,
        }
    }

    pub fn from_goals(home: u32, away: u32) -> Self {
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => HalfTimeLeader::Home,
            std::cmp::Ordering::Less => HalfTimeLeader::Away,
            std::cmp::Ordering::Equal => HalfTimeLeader::Level,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            HalfTimeLeader::Home => "H",
            HalfTimeLeader::Away => "A",
            HalfTimeLeader::Level => "D",
        }
    }
}

/// Whether the tracked team played at home or away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    pub fn as_str(self) -> &'static str {
        match self {
            Venue::Home => "Home",
            Venue::Away => "Away",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full-time result from the tracked team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn from_goals(goals_for: u32, goals_against: u32) -> Self {
        match goals_for.cmp(&goals_against) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }

    /// League points: 3 for a win, 1 for a draw.
    pub fn points(self) -> u32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::Draw => "Draw",
            Outcome::Loss => "Loss",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-side counter such as shots or yellow cards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideCounts {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

impl SideCounts {
    pub fn new(home: Option<u32>, away: Option<u32>) -> Self {
        Self { home, away }
    }

    /// Combined count, only when both sides are known.
    pub fn total(&self) -> Option<u32> {
        Some(self.home?.saturating_add(self.away?))
    }
}

/// Expected goals of both sides, from exports that carry shot-level xG.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}

impl ExpectedGoals {
    pub fn new(home: f64, away: f64) -> Self {
        Self { home, away }
    }

    /// Home xG minus away xG.
    pub fn diff(&self) -> f64 {
        self.home - self.away
    }
}

/// Optional match counters carried by the richer exports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCounters {
    pub shots: SideCounts,
    pub fouls: SideCounts,
    pub yellow_cards: SideCounts,
    pub red_cards: SideCounts,
}

/// One played match, as loaded from a results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: Option<NaiveDate>,
    pub season: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub half_time_leader: Option<HalfTimeLeader>,
    #[serde(default)]
    pub counters: MatchCounters,
    #[serde(default)]
    pub xg: Option<ExpectedGoals>,
    /// Round number within the season, when the export has one.
    #[serde(default)]
    pub gameweek: Option<u32>,
}

impl MatchRecord {
    pub fn new(
        date: Option<NaiveDate>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_goals: u32,
        away_goals: u32,
    ) -> Self {
        Self {
            date,
            season: None,
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_goals,
            away_goals,
            half_time_leader: None,
            counters: MatchCounters::default(),
            xg: None,
            gameweek: None,
        }
    }

    pub fn with_half_time_leader(mut self, leader: HalfTimeLeader) -> Self {
        self.half_time_leader = Some(leader);
        self
    }

    pub fn with_xg(mut self, home: f64, away: f64) -> Self {
        self.xg = Some(ExpectedGoals::new(home, away));
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    pub fn total_goals(&self) -> u32 {
        self.home_goals.saturating_add(self.away_goals)
    }

    pub fn win_margin(&self) -> u32 {
        self.home_goals.abs_diff(self.away_goals)
    }

    /// Full-time result from the home side's perspective.
    pub fn home_outcome(&self) -> Outcome {
        Outcome::from_goals(self.home_goals, self.away_goals)
    }

    /// The explicit season label, or one derived from the date.
    pub fn season_label(&self) -> Option<String> {
        self.season
            .clone()
            .or_else(|| self.date.map(season_for_date))
    }
}

/// Season label (`2019/20`) for a match date; seasons roll over in August.
pub fn season_for_date(date: NaiveDate) -> String {
    let start = if date.month() >= 8 {
        date.year()
    } else {
        date.year() - 1
    };
    season_from_start_year(start)
}

/// `2016` (season end year) becomes `2015/16`.
pub fn season_from_end_year(end_year: i32) -> String {
    season_from_start_year(end_year - 1)
}

fn season_from_start_year(start: i32) -> String {
    format!("{}/{:02}", start, (start + 1).rem_euclid(100))
}

/// Season end year of a `2015/16` style label, or of a bare year.
pub fn season_end_year(label: &str) -> Option<i32> {
    let label = label.trim();
    match label.split_once(['/', '-']) {
        Some((start, _)) => start.trim().parse::<i32>().ok().map(|y| y + 1),
        None => label.parse().ok(),
    }
}
