//! Per-match averages (goals, margins, shots, discipline) over time.

use crate::analyzers::aggregate::{group_records, labels};
use crate::analyzers::types::{GroupKey, Percent, TrendRow};
use crate::analyzers::utility::{mean, stddev};
use crate::classify::ClassifiedRecord;
use crate::periods::UNKNOWN_PERIOD;
use crate::record::{MatchRecord, SideCounts};
use std::collections::BTreeMap;

fn average_of(
    matches: &[&MatchRecord],
    counter: impl Fn(&MatchRecord) -> SideCounts,
) -> Option<f64> {
    let values: Vec<f64> = matches
        .iter()
        .filter_map(|m| counter(*m).total())
        .map(f64::from)
        .collect();
    mean(&values)
}

/// Goals scored per shot taken, as a percentage.
fn shot_conversion(matches: &[&MatchRecord]) -> Percent {
    let (goals, shots) = matches
        .iter()
        .filter_map(|m| Some((m.total_goals(), m.counters.shots.total()?)))
        .fold((0u32, 0u32), |(goals, shots), (g, s)| {
            (goals.saturating_add(g), shots.saturating_add(s))
        });
    Percent::of(goals, shots)
}

fn trend_row(group_key: Vec<String>, matches: &[&MatchRecord]) -> TrendRow {
    let goals: Vec<f64> = matches.iter().map(|m| f64::from(m.total_goals())).collect();
    let margins: Vec<f64> = matches.iter().map(|m| f64::from(m.win_margin())).collect();
    let avg_total_goals = mean(&goals);

    TrendRow {
        group_key,
        match_count: matches.len() as u32,
        avg_total_goals,
        total_goals_stddev: avg_total_goals.and_then(|avg| stddev(&goals, avg)),
        avg_win_margin: mean(&margins),
        avg_total_shots: average_of(matches, |m| m.counters.shots),
        avg_total_fouls: average_of(matches, |m| m.counters.fouls),
        avg_yellow_cards: average_of(matches, |m| m.counters.yellow_cards),
        avg_red_cards: average_of(matches, |m| m.counters.red_cards),
        shot_conversion: shot_conversion(matches),
    }
}

/// Averages over the tracked team's matches per group.
pub fn match_trends(records: &[ClassifiedRecord<'_>], group_by: &[GroupKey]) -> Vec<TrendRow> {
    group_records(records, group_by)
        .into_iter()
        .map(|(key, members)| {
            let matches: Vec<&MatchRecord> = members.iter().map(|c| c.record).collect();
            trend_row(labels(key), &matches)
        })
        .collect()
}

/// Averages over every match in the data set, per season.
pub fn league_trends_by_season(matches: &[MatchRecord]) -> Vec<TrendRow> {
    let mut seasons: BTreeMap<(bool, String), Vec<&MatchRecord>> = BTreeMap::new();
    for m in matches {
        let key = match m.season_label() {
            Some(season) => (false, season),
            None => (true, UNKNOWN_PERIOD.to_string()),
        };
        seasons.entry(key).or_default().push(m);
    }

    seasons
        .into_iter()
        .map(|((_, season), members)| trend_row(vec![season], &members))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::periods::PeriodScheme;
    use crate::record::MatchCounters;

    fn game(season: &str, home: &str, away: &str, hg: u32, ag: u32) -> MatchRecord {
        MatchRecord::new(None, home, away, hg, ag).with_season(season)
    }

    #[test]
    fn test_league_trends_by_season() {
        let mut with_shots = game("2019/20", "A", "B", 1, 1);
        with_shots.counters = MatchCounters {
            shots: SideCounts::new(Some(12), Some(8)),
            yellow_cards: SideCounts::new(Some(2), Some(3)),
            ..MatchCounters::default()
        };
        let matches = vec![
            game("2018/19", "A", "B", 3, 1),
            game("2018/19", "B", "C", 0, 0),
            with_shots,
            game("2019/20", "C", "A", 4, 0),
            MatchRecord::new(None, "A", "C", 1, 0),
        ];

        let rows = league_trends_by_season(&matches);
        let keys: Vec<_> = rows.iter().map(|r| r.group_key[0].as_str()).collect();
        assert_eq!(keys, ["2018/19", "2019/20", "Unknown"]);

        assert_eq!(rows[0].match_count, 2);
        assert_eq!(rows[0].avg_total_goals, Some(2.0));
        assert_eq!(rows[0].total_goals_stddev, Some(2.0));
        assert_eq!(rows[0].avg_win_margin, Some(1.0));
        assert_eq!(rows[0].avg_total_shots, None);

        assert_eq!(rows[1].avg_total_goals, Some(3.0));
        assert_eq!(rows[1].avg_total_shots, Some(20.0));
        assert_eq!(rows[1].avg_yellow_cards, Some(5.0));
        assert_eq!(rows[1].avg_red_cards, None);

        // Only the match with shots counts: 2 goals from 20 shots.
        assert_eq!(rows[1].shot_conversion.rounded(), Some(10.0));
        assert!(rows[0].shot_conversion.is_no_data());
    }

    #[test]
    fn test_shot_conversion_with_no_shots_taken() {
        let mut blank = game("2019/20", "A", "B", 0, 0);
        blank.counters.shots = SideCounts::new(Some(0), Some(0));
        let rows = league_trends_by_season(&[blank]);
        assert!(rows[0].shot_conversion.is_no_data());
    }

    #[test]
    fn test_match_trends_by_venue() {
        let matches = vec![
            game("2018/19", "A", "B", 3, 1),
            game("2018/19", "B", "A", 2, 2),
            game("2018/19", "A", "C", 1, 0),
            game("2018/19", "B", "C", 5, 5),
        ];
        let scheme = PeriodScheme::covid();
        let classified = Classifier::new("A", &scheme).classify_all(&matches);

        let rows = match_trends(&classified, &[GroupKey::Venue]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group_key, vec!["Home"]);
        assert_eq!(rows[0].match_count, 2);
        assert_eq!(rows[0].avg_total_goals, Some(2.5));
        assert_eq!(rows[0].avg_win_margin, Some(1.5));
        assert_eq!(rows[1].group_key, vec!["Away"]);
        assert_eq!(rows[1].avg_total_goals, Some(4.0));
    }
}
