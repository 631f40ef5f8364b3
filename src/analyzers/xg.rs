//! Expected-goals tables for data sets that carry per-match xG.

use crate::analyzers::utility::mean;
use crate::record::MatchRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Expected goals for and against one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XgRow {
    pub team: String,
    pub matches: u32,
    pub xg: f64,
    pub xga: f64,
    pub xg_per_match: f64,
    pub xga_per_match: f64,
    /// `xg_per_match - xga_per_match`.
    pub delta_per_match: f64,
    pub home_xg_per_match: Option<f64>,
    pub away_xg_per_match: Option<f64>,
    /// Mean of own xG minus opponent xG in home matches.
    pub home_xg_diff: Option<f64>,
    pub goals_per_match: f64,
    /// Actual goals per match minus xG per match; positive means finishing
    /// above expectation.
    pub goals_minus_xg: f64,
}

#[derive(Default)]
struct XgTally {
    home_for: Vec<f64>,
    home_against: Vec<f64>,
    away_for: Vec<f64>,
    away_against: Vec<f64>,
    goals: Vec<f64>,
}

impl XgTally {
    fn into_row(self, team: &str) -> XgRow {
        let matches = self.goals.len() as u32;
        let xg: f64 = self.home_for.iter().chain(&self.away_for).sum();
        let xga: f64 = self.home_against.iter().chain(&self.away_against).sum();
        let per_match = |total: f64| total / f64::from(matches.max(1));
        let home_diffs: Vec<f64> = self
            .home_for
            .iter()
            .zip(&self.home_against)
            .map(|(f, a)| f - a)
            .collect();
        let goals_per_match = mean(&self.goals).unwrap_or(0.0);

        XgRow {
            team: team.to_string(),
            matches,
            xg,
            xga,
            xg_per_match: per_match(xg),
            xga_per_match: per_match(xga),
            delta_per_match: per_match(xg) - per_match(xga),
            home_xg_per_match: mean(&self.home_for),
            away_xg_per_match: mean(&self.away_for),
            home_xg_diff: mean(&home_diffs),
            goals_per_match,
            goals_minus_xg: goals_per_match - per_match(xg),
        }
    }
}

/// Per-team xG table over every match with xG data, highest xG per match
/// first.
///
/// With `before_gameweek`, only matches from earlier gameweeks count and
/// matches without a gameweek are left out.
pub fn xg_table(matches: &[MatchRecord], before_gameweek: Option<u32>) -> Vec<XgRow> {
    let mut teams: BTreeMap<&str, XgTally> = BTreeMap::new();

    for m in matches {
        let Some(xg) = m.xg else { continue };
        let too_late =
            before_gameweek.is_some_and(|limit| !m.gameweek.is_some_and(|gw| gw < limit));
        if too_late {
            continue;
        }

        let home = teams.entry(m.home_team.as_str()).or_default();
        home.home_for.push(xg.home);
        home.home_against.push(xg.away);
        home.goals.push(f64::from(m.home_goals));

        let away = teams.entry(m.away_team.as_str()).or_default();
        away.away_for.push(xg.away);
        away.away_against.push(xg.home);
        away.goals.push(f64::from(m.away_goals));
    }

    let mut rows: Vec<XgRow> = teams
        .into_iter()
        .map(|(team, tally)| tally.into_row(team))
        .collect();
    rows.sort_by(compare_xg);
    rows
}

fn compare_xg(a: &XgRow, b: &XgRow) -> Ordering {
    b.xg_per_match
        .total_cmp(&a.xg_per_match)
        .then_with(|| a.team.cmp(&b.team))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(gw: u32, home: &str, away: &str, goals: (u32, u32), xg: (f64, f64)) -> MatchRecord {
        let mut m = MatchRecord::new(None, home, away, goals.0, goals.1).with_xg(xg.0, xg.1);
        m.gameweek = Some(gw);
        m
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample() -> Vec<MatchRecord> {
        vec![
            game(1, "A", "B", (2, 0), (1.5, 0.5)),
            game(2, "B", "A", (1, 1), (1.0, 2.0)),
            game(3, "A", "C", (0, 1), (0.5, 1.5)),
            MatchRecord::new(None, "A", "D", 5, 0),
        ]
    }

    #[test]
    fn test_xg_table_per_team() {
        let rows = xg_table(&sample(), None);
        let teams: Vec<_> = rows.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(teams, ["C", "A", "B"]);

        let a = &rows[1];
        assert_eq!(a.matches, 3);
        assert!(close(a.xg, 4.0));
        assert!(close(a.xga, 3.0));
        assert!(close(a.xg_per_match, 4.0 / 3.0));
        assert!(close(a.delta_per_match, 1.0 / 3.0));
        assert_eq!(a.home_xg_per_match, Some(1.0));
        assert_eq!(a.away_xg_per_match, Some(2.0));
        assert_eq!(a.home_xg_diff, Some(0.0));
        assert!(close(a.goals_minus_xg, -1.0 / 3.0));

        let c = &rows[0];
        assert_eq!(c.home_xg_per_match, None);
        assert_eq!(c.home_xg_diff, None);
    }

    #[test]
    fn test_xg_table_before_gameweek() {
        let rows = xg_table(&sample(), Some(3));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.matches == 2));
        assert!(rows.iter().all(|r| r.team != "C"));
    }

    #[test]
    fn test_xg_table_without_xg_is_empty() {
        let matches = vec![MatchRecord::new(None, "A", "B", 1, 0)];
        assert!(xg_table(&matches, None).is_empty());
    }
}
