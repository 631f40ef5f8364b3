use match_stats::analyzers::rankings::{team_rate_rankings, venue_splits};
use match_stats::analyzers::trends::league_trends_by_season;
use match_stats::analyzers::xg::xg_table;
use match_stats::analyzers::{
    GroupKey, RateKind, comeback_rate, conversion_rate, rate_table, summarize,
};
use match_stats::config::PeriodConfig;
use match_stats::filter::MatchFilter;
use match_stats::managers::load_managers;
use match_stats::output::Table;
use match_stats::parser::{LoadOptions, load_matches, load_matches_or_empty, parse_matches, write_matches};
use match_stats::{BoundaryRule, Classifier, MatchRecord, MatchStatsError, PeriodScheme};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn load(name: &str) -> Vec<MatchRecord> {
    load_matches(&fixture(name), &LoadOptions::default())
        .expect("Failed to load fixture")
        .0
}

#[test]
fn test_football_data_load_report() {
    let (matches, report) =
        load_matches(&fixture("football_data.csv"), &LoadOptions::default()).unwrap();
    assert_eq!(report.rows_read, 13);
    assert_eq!(report.loaded, 12);
    assert_eq!(report.incomplete, 1);
    assert_eq!(report.malformed, 0);
    assert_eq!(matches.len(), 12);
}

#[test]
fn test_summary_by_venue() {
    let matches = load("football_data.csv");
    let scheme = PeriodScheme::covid();
    let classified = Classifier::new("Liverpool", &scheme).classify_all(&matches);
    assert_eq!(classified.len(), 11);

    let rows = summarize(&classified, &[GroupKey::Venue]);
    assert_eq!(rows.len(), 2);

    let home = &rows[0];
    assert_eq!(home.group_key, vec!["Home"]);
    assert_eq!(
        (home.match_count, home.win_count, home.draw_count, home.loss_count),
        (4, 4, 0, 0)
    );
    assert_eq!((home.goals_for, home.goals_against), (11, 3));

    let away = &rows[1];
    assert_eq!(away.group_key, vec!["Away"]);
    assert_eq!(
        (away.match_count, away.win_count, away.draw_count, away.loss_count),
        (7, 2, 3, 2)
    );
    assert_eq!((away.goals_for, away.goals_against), (7, 10));
    assert_eq!(away.points, 9);
}

#[test]
fn test_summary_by_period_respects_boundary_rule() {
    let matches = load("football_data.csv");

    let exclusive = PeriodScheme::covid();
    let classified = Classifier::new("Liverpool", &exclusive).classify_all(&matches);
    let rows = summarize(&classified, &[GroupKey::Period]);
    let counts: Vec<_> = rows
        .iter()
        .map(|r| (r.group_key[0].as_str(), r.match_count, r.win_count))
        .collect();
    assert_eq!(
        counts,
        [("Pre-COVID", 5, 3), ("During COVID", 4, 1), ("Post-COVID", 2, 2)]
    );

    let inclusive = PeriodScheme::covid().with_rule(BoundaryRule::Inclusive);
    let classified = Classifier::new("Liverpool", &inclusive).classify_all(&matches);
    let rows = summarize(&classified, &[GroupKey::Period]);
    let counts: Vec<_> = rows.iter().map(|r| r.match_count).collect();
    assert_eq!(counts, [6, 4, 1]);
}

#[test]
fn test_summary_by_venue_and_period() {
    let matches = load("football_data.csv");
    let scheme = PeriodScheme::covid();
    let classified = Classifier::new("Liverpool", &scheme).classify_all(&matches);

    let rows = summarize(&classified, &[GroupKey::Venue, GroupKey::Period]);
    let total: u32 = rows.iter().map(|r| r.match_count).sum();
    assert_eq!(total, 11);
    assert_eq!(rows[0].group_key, vec!["Home", "Pre-COVID"]);
    assert!(rows.iter().all(|r| r.match_count > 0));
}

#[test]
fn test_half_time_rates() {
    let matches = load("football_data.csv");
    let scheme = PeriodScheme::covid();
    let classified = Classifier::new("Liverpool", &scheme).classify_all(&matches);

    assert_eq!(conversion_rate(&classified).to_string(), "80.0");
    assert_eq!(comeback_rate(&classified).to_string(), "33.3");

    let rows = rate_table(&classified, &[GroupKey::Period], RateKind::Conversion);
    let rates: Vec<_> = rows
        .iter()
        .map(|r| (r.group_key[0].as_str(), r.stat.opportunities, r.stat.rate.to_string()))
        .collect();
    assert_eq!(
        rates,
        [
            ("Pre-COVID", 2, "100.0".to_string()),
            ("During COVID", 2, "50.0".to_string()),
            ("Post-COVID", 1, "100.0".to_string()),
        ]
    );
}

#[test]
fn test_league_conversion_rankings() {
    let matches = load("football_data.csv");
    let ranked = team_rate_rankings(&matches, RateKind::Conversion, 1);
    let teams: Vec<_> = ranked.iter().map(|t| t.team.as_str()).collect();
    assert_eq!(
        teams,
        ["Chelsea", "Man City", "Liverpool", "Leeds", "Man United"]
    );
    assert_eq!(ranked[2].stat.rate.rounded(), Some(80.0));

    let splits = venue_splits(&matches);
    let liverpool = splits.iter().find(|s| s.team == "Liverpool").unwrap();
    assert_eq!(liverpool.home.wins, 4);
    assert_eq!(liverpool.away.played, 7);
}

#[test]
fn test_premier_league_matches_layout() {
    let matches = load("premier_league_matches.csv");
    let scheme = PeriodScheme::covid();
    let classified = Classifier::new("Liverpool", &scheme).classify_all(&matches);

    let rows = summarize(&classified, &[GroupKey::Season]);
    let seasons: Vec<_> = rows
        .iter()
        .map(|r| (r.group_key[0].as_str(), r.match_count, r.points))
        .collect();
    assert_eq!(seasons, [("2015/16", 3, 7), ("2016/17", 3, 6)]);

    // No half-time columns in this layout.
    assert!(conversion_rate(&classified).is_no_data());
    assert!(rate_table(&classified, &[], RateKind::Comeback).is_empty());
}

#[test]
fn test_epl_final_trends() {
    let matches = load("epl_final.csv");
    let rows = league_trends_by_season(&matches);
    assert_eq!(rows.len(), 2);

    let first = &rows[0];
    assert_eq!(first.group_key, vec!["2020/21"]);
    assert_eq!(first.avg_total_goals, Some(4.5));
    assert_eq!(first.avg_win_margin, Some(1.5));
    assert_eq!(first.avg_total_shots, Some(23.5));
    assert_eq!(first.avg_total_fouls, Some(17.0));
    assert_eq!(first.avg_yellow_cards, Some(2.0));
    assert_eq!(first.avg_red_cards, Some(0.5));

    assert_eq!(first.shot_conversion.to_string(), "19.1");

    assert_eq!(rows[1].avg_total_shots, Some(28.5));
    assert_eq!(rows[1].shot_conversion.to_string(), "8.8");
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_epl_result_xg_table() {
    let matches = load("epl_result.csv");
    assert_eq!(matches.len(), 6);

    let rows = xg_table(&matches, None);
    let teams: Vec<_> = rows.iter().map(|r| r.team.as_str()).collect();
    assert_eq!(
        teams,
        [
            "Aston Villa",
            "Liverpool",
            "West Ham",
            "Arsenal",
            "Chelsea",
            "Fulham",
            "Leeds United"
        ]
    );

    let liverpool = &rows[1];
    assert_eq!(liverpool.matches, 4);
    assert!(close(liverpool.xg_per_match, 2.35));
    assert!(close(liverpool.xga_per_match, 1.3));
    assert!(close(liverpool.delta_per_match, 1.05));
    assert!(liverpool.home_xg_per_match.is_some_and(|v| close(v, 2.9)));
    assert!(liverpool.away_xg_per_match.is_some_and(|v| close(v, 1.8)));
    assert!(close(liverpool.goals_per_match, 2.75));

    let early = xg_table(&matches, Some(3));
    let liverpool = early.iter().find(|r| r.team == "Liverpool").unwrap();
    assert_eq!(liverpool.matches, 2);
    assert!(close(liverpool.xg_per_match, 2.4));
    assert!(early.iter().all(|r| r.team != "Aston Villa"));
}

#[test]
fn test_unreadable_shots_still_count_in_summary() {
    let csv = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,HTR,HS,AS
2021-01-08,Liverpool,Everton,1,0,H,NA,4
2021-01-15,Everton,Liverpool,1,1,D,7,9
";
    let (matches, report) = parse_matches(csv.as_bytes(), &LoadOptions::default()).unwrap();
    assert_eq!(report.malformed, 0);
    assert_eq!(report.loaded, 2);

    let scheme = PeriodScheme::covid();
    let classified = Classifier::new("Liverpool", &scheme).classify_all(&matches);
    let rows = summarize(&classified, &[]);
    assert_eq!(rows.len(), 1);
    assert_eq!((rows[0].match_count, rows[0].win_count, rows[0].draw_count), (2, 1, 1));
    assert_eq!(conversion_rate(&classified).to_string(), "100.0");
}

#[test]
fn test_missing_input_yields_empty_summary() {
    let path = fixture("does_not_exist.csv");
    assert!(matches!(
        load_matches(&path, &LoadOptions::default()),
        Err(MatchStatsError::MissingInput { .. })
    ));

    let matches = load_matches_or_empty(&path, &LoadOptions::default()).unwrap();
    assert!(matches.is_empty());

    let scheme = PeriodScheme::covid();
    let classified = Classifier::new("Liverpool", &scheme).classify_all(&matches);
    assert!(summarize(&classified, &[GroupKey::Venue]).is_empty());
    assert!(conversion_rate(&classified).is_no_data());
}

#[test]
fn test_period_config_fixture() {
    let scheme = PeriodConfig::load(fixture("periods.json"))
        .unwrap()
        .into_scheme()
        .unwrap();
    assert_eq!(scheme.rule(), BoundaryRule::Inclusive);

    let matches = load("football_data.csv");
    let classified = Classifier::new("Liverpool", &scheme).classify_all(&matches);
    let rows = summarize(&classified, &[GroupKey::Period]);
    let counts: Vec<_> = rows
        .iter()
        .map(|r| (r.group_key[0].as_str(), r.match_count))
        .collect();
    assert_eq!(counts, [("Before", 6), ("After", 5)]);
}

#[test]
fn test_extract_and_reload() {
    let matches = load("premier_league_matches.csv");
    let filter = MatchFilter::default()
        .team("Liverpool")
        .seasons(Some(2017), Some(2017));
    let kept = filter.apply(&matches);
    assert_eq!(kept.len(), 3);

    let mut buffer = Vec::new();
    write_matches(&mut buffer, &kept).unwrap();
    let (reloaded, report) = parse_matches(buffer.as_slice(), &LoadOptions::default()).unwrap();
    assert_eq!(report.malformed, 0);
    assert_eq!(reloaded, kept);
}

#[test]
fn test_managers_fixture() {
    let reference = chrono::NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    let tenures = load_managers(&fixture("managers.csv"), reference).unwrap();
    let names: Vec<_> = tenures.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Brendan Rodgers", "Jurgen Klopp", "Arne Slot"]);
    assert_eq!(tenures[0].days, 1220);
    assert_eq!(tenures[0].years, 3.3);

    let table = Table::build(&[], &tenures);
    assert_eq!(table.rows[2][2], "-");
}
