//! League-wide team tables computed directly from match records.

use crate::analyzers::types::{RateKind, RateStat, Tally, TeamRate, VenueSplit};
use crate::record::{HalfTimeLeader, MatchRecord, Outcome};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Conversion or comeback rate of every team that had at least
/// `min_opportunities` chances, best first.
///
/// Ties are broken by opportunities (more first), then team name.
pub fn team_rate_rankings(
    matches: &[MatchRecord],
    kind: RateKind,
    min_opportunities: u32,
) -> Vec<TeamRate> {
    let mut stats: BTreeMap<&str, RateStat> = BTreeMap::new();

    for m in matches {
        let (leader, trailer) = match m.half_time_leader {
            Some(HalfTimeLeader::Home) => (m.home_team.as_str(), m.away_team.as_str()),
            Some(HalfTimeLeader::Away) => (m.away_team.as_str(), m.home_team.as_str()),
            _ => continue,
        };
        let leader_won = match m.half_time_leader {
            Some(HalfTimeLeader::Home) => m.home_outcome() == Outcome::Win,
            _ => m.home_outcome() == Outcome::Loss,
        };

        match kind {
            RateKind::Conversion => stats.entry(leader).or_default().record(leader_won),
            RateKind::Comeback => {
                let trailer_won = m.home_goals != m.away_goals && !leader_won;
                stats.entry(trailer).or_default().record(trailer_won)
            }
        }
    }

    let mut ranked: Vec<TeamRate> = stats
        .into_iter()
        .filter(|(_, stat)| stat.opportunities >= min_opportunities.max(1))
        .map(|(team, stat)| TeamRate {
            team: team.to_string(),
            stat,
        })
        .collect();

    ranked.sort_by(compare_rates);
    ranked
}

fn compare_rates(a: &TeamRate, b: &TeamRate) -> Ordering {
    let ra = a.stat.rate.value().unwrap_or(f64::NEG_INFINITY);
    let rb = b.stat.rate.value().unwrap_or(f64::NEG_INFINITY);
    rb.total_cmp(&ra)
        .then(b.stat.opportunities.cmp(&a.stat.opportunities))
        .then_with(|| a.team.cmp(&b.team))
}

/// Home and away win/draw/loss records for every team, ordered by name.
pub fn venue_splits(matches: &[MatchRecord]) -> Vec<VenueSplit> {
    let mut splits: BTreeMap<&str, (Tally, Tally)> = BTreeMap::new();

    for m in matches {
        let home_outcome = m.home_outcome();
        let away_outcome = match home_outcome {
            Outcome::Win => Outcome::Loss,
            Outcome::Draw => Outcome::Draw,
            Outcome::Loss => Outcome::Win,
        };
        splits
            .entry(m.home_team.as_str())
            .or_default()
            .0
            .record(home_outcome, m.home_goals, m.away_goals);
        splits
            .entry(m.away_team.as_str())
            .or_default()
            .1
            .record(away_outcome, m.away_goals, m.home_goals);
    }

    splits
        .into_iter()
        .map(|(team, (home, away))| VenueSplit {
            team: team.to_string(),
            home,
            away,
        })
        .collect()
}
