//! CSV loader for match results.
//!
//! Accepts the column layouts of the football-data.co.uk exports
//! (`HomeTeam`, `FTHG`, `HTR`, ...), the `premier-league-matches` dump
//! (`Home`, `HomeGoals`, `Season_End_Year`) and the `epl_final` layout
//! (`FullTimeHomeGoals`, `HalfTimeResult`, `HomeShots`, ...), plus the
//! expected-goals columns (`G_Home`, `xG_Home`, `GW`) of `EPL_result`.
//!
//! Only the teams and the full-time score decide whether a row is usable.
//! An unreadable optional column is logged and left empty.

use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::{debug, info, warn};

use crate::error::{MatchStatsError, Result};
use crate::fetch::read_source;
use crate::record::{
    ExpectedGoals, HalfTimeLeader, MatchCounters, MatchRecord, Outcome, SideCounts,
    season_end_year, season_from_end_year,
};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];
const SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y"];
/// Upper bound for any per-match count; larger values are data errors.
const MAX_COUNT: u32 = 1000;
/// Upper bound for one side's expected goals.
const MAX_XG: f64 = 100.0;

/// One CSV row before validation. Every column is optional so that rows
/// with gaps can be reported instead of aborting the whole file.
#[derive(Debug, Default, Deserialize)]
struct RawMatchRow {
    #[serde(alias = "Date", alias = "MatchDate", default)]
    date: Option<String>,
    #[serde(alias = "Season", default)]
    season: Option<String>,
    #[serde(rename = "Season_End_Year", default)]
    season_end_year: Option<String>,

    #[serde(alias = "HomeTeam", alias = "Home", default)]
    home_team: Option<String>,
    #[serde(alias = "AwayTeam", alias = "Away", default)]
    away_team: Option<String>,
    #[serde(
        alias = "FTHG",
        alias = "HomeGoals",
        alias = "FullTimeHomeGoals",
        alias = "G_Home",
        default
    )]
    home_goals: Option<String>,
    #[serde(
        alias = "FTAG",
        alias = "AwayGoals",
        alias = "FullTimeAwayGoals",
        alias = "G_Away",
        default
    )]
    away_goals: Option<String>,
    #[serde(alias = "GW", alias = "Wk", default)]
    gameweek: Option<String>,

    #[serde(alias = "HTR", alias = "HalfTimeResult", default)]
    half_time_result: Option<String>,
    #[serde(alias = "HTHG", alias = "HalfTimeHomeGoals", default)]
    half_time_home_goals: Option<String>,
    #[serde(alias = "HTAG", alias = "HalfTimeAwayGoals", default)]
    half_time_away_goals: Option<String>,

    #[serde(alias = "HS", alias = "HomeShots", default)]
    home_shots: Option<String>,
    #[serde(rename = "AS", alias = "AwayShots", default)]
    away_shots: Option<String>,
    #[serde(alias = "HF", alias = "HomeFouls", default)]
    home_fouls: Option<String>,
    #[serde(alias = "AF", alias = "AwayFouls", default)]
    away_fouls: Option<String>,
    #[serde(alias = "HY", alias = "HomeYellowCards", default)]
    home_yellow_cards: Option<String>,
    #[serde(alias = "AY", alias = "AwayYellowCards", default)]
    away_yellow_cards: Option<String>,
    #[serde(alias = "HR", alias = "HomeRedCards", default)]
    home_red_cards: Option<String>,
    #[serde(alias = "AR", alias = "AwayRedCards", default)]
    away_red_cards: Option<String>,

    #[serde(rename = "xG_Home", default)]
    home_xg: Option<String>,
    #[serde(rename = "xG_Away", default)]
    away_xg: Option<String>,
}

/// Loader settings.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// What happened to the rows of one input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub loaded: usize,
    /// Rows without both teams and a full-time score.
    pub incomplete: usize,
    /// Rows that could not be parsed.
    pub malformed: usize,
}

/// Parses a count column; accepts `2` and `2.0` up to [`MAX_COUNT`].
/// Blank is `None`.
fn parse_count(value: Option<&str>) -> std::result::Result<Option<u32>, String> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let n = match raw.parse::<u32>() {
        Ok(n) => n,
        Err(_) => match raw.parse::<f64>() {
            Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => f as u32,
            _ => return Err(format!("'{raw}' is not a non-negative whole number")),
        },
    };
    if n > MAX_COUNT {
        return Err(format!("{n} is above the limit of {MAX_COUNT}"));
    }
    Ok(Some(n))
}

/// Parses an expected-goals column: a finite value in `[0, MAX_XG]`.
fn parse_xg(value: Option<&str>) -> std::result::Result<Option<f64>, String> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(x) if (0.0..=MAX_XG).contains(&x) => Ok(Some(x)),
        _ => Err(format!("'{raw}' is not a valid expected-goals value")),
    }
}

/// Parses the supported date formats, ignoring any trailing time of day.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.trim().split(['T', ' ']).next()?;
    // `%Y` also accepts two digits, so `09/08/19` has to be routed explicitly.
    let parts: Vec<&str> = day.split(['/', '-']).collect();
    let short_year = parts.len() == 3 && parts[0].len() <= 2 && parts[2].len() == 2;
    let formats = if short_year {
        SHORT_YEAR_FORMATS
    } else {
        DATE_FORMATS
    };
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}

/// `2015-2016` and `2015/16` become `2015/16`; anything else is kept as is.
fn normalize_season(label: &str) -> String {
    let label = label.trim();
    if label.contains(['/', '-']) {
        if let Some(end) = season_end_year(label) {
            return season_from_end_year(end);
        }
    }
    label.to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RawMatchRow {
    /// `Ok(None)` for incomplete rows, `Err` when a team or full-time goal
    /// column is unreadable. Other unreadable columns are warned about and
    /// dropped.
    fn into_record(self, row: u64) -> Result<Option<MatchRecord>> {
        let invalid = |reason: String| MatchStatsError::InvalidRecord { row, reason };
        let count = |value: &Option<String>, column: &str| {
            parse_count(value.as_deref()).map_err(|e| invalid(format!("{column}: {e}")))
        };
        let optional = |value: &Option<String>, column: &str| {
            parse_count(value.as_deref()).unwrap_or_else(|e| {
                warn!(row, column, error = %e, "Ignoring unreadable value");
                None
            })
        };

        let home_goals = count(&self.home_goals, "home goals")?;
        let away_goals = count(&self.away_goals, "away goals")?;

        let ht_home = optional(&self.half_time_home_goals, "half-time home goals");
        let ht_away = optional(&self.half_time_away_goals, "half-time away goals");
        let counters = MatchCounters {
            shots: SideCounts::new(
                optional(&self.home_shots, "home shots"),
                optional(&self.away_shots, "away shots"),
            ),
            fouls: SideCounts::new(
                optional(&self.home_fouls, "home fouls"),
                optional(&self.away_fouls, "away fouls"),
            ),
            yellow_cards: SideCounts::new(
                optional(&self.home_yellow_cards, "home yellow cards"),
                optional(&self.away_yellow_cards, "away yellow cards"),
            ),
            red_cards: SideCounts::new(
                optional(&self.home_red_cards, "home red cards"),
                optional(&self.away_red_cards, "away red cards"),
            ),
        };
        let gameweek = optional(&self.gameweek, "gameweek");

        let from_goals = match (ht_home, ht_away) {
            (Some(h), Some(a)) => Some(HalfTimeLeader::from_goals(h, a)),
            _ => None,
        };
        let half_time_leader = match non_blank(self.half_time_result) {
            Some(code) => match HalfTimeLeader::from_code(&code) {
                Some(leader) => Some(leader),
                None => {
                    warn!(row, code = %code, "Ignoring unknown half-time result");
                    from_goals
                }
            },
            None => from_goals,
        };

        let xg_value = |value: &Option<String>, column: &str| {
            parse_xg(value.as_deref()).unwrap_or_else(|e| {
                warn!(row, column, error = %e, "Ignoring unreadable value");
                None
            })
        };
        let xg = match (
            xg_value(&self.home_xg, "home xG"),
            xg_value(&self.away_xg, "away xG"),
        ) {
            (Some(home), Some(away)) => Some(ExpectedGoals::new(home, away)),
            _ => None,
        };

        let date = non_blank(self.date).and_then(|d| parse_date(&d));
        let season = non_blank(self.season)
            .map(|s| normalize_season(&s))
            .or_else(|| {
                non_blank(self.season_end_year)
                    .and_then(|y| season_end_year(&y))
                    .map(season_from_end_year)
            });

        let (Some(home_team), Some(away_team), Some(home_goals), Some(away_goals)) = (
            non_blank(self.home_team),
            non_blank(self.away_team),
            home_goals,
            away_goals,
        ) else {
            return Ok(None);
        };

        Ok(Some(MatchRecord {
            date,
            season,
            home_team,
            away_team,
            home_goals,
            away_goals,
            half_time_leader,
            counters,
            xg,
            gameweek,
        }))
    }
}

/// Parses match rows from CSV text. Incomplete and malformed rows are
/// skipped with a warning and counted in the returned [`LoadReport`].
///
/// # Errors
///
/// Fails only if the header row cannot be read.
pub fn parse_matches<R: Read>(
    reader: R,
    options: &LoadOptions,
) -> Result<(Vec<MatchRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    rdr.headers()?;

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for (i, result) in rdr.deserialize::<RawMatchRow>().enumerate() {
        report.rows_read += 1;
        // Header is line 1.
        let row = i as u64 + 2;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!(row, error = %e, "Skipping malformed row");
                report.malformed += 1;
                continue;
            }
        };

        match raw.into_record(row) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {
                debug!(row, "Dropping row without teams or final score");
                report.incomplete += 1;
            }
            Err(e) => {
                warn!(row, error = %e, "Skipping invalid row");
                report.malformed += 1;
            }
        }
    }

    report.loaded = records.len();
    Ok((records, report))
}

/// Reads and parses `source` (a path or URL, optionally gzipped).
///
/// # Errors
///
/// [`MatchStatsError::MissingInput`] when the file does not exist.
pub fn load_matches(source: &str, options: &LoadOptions) -> Result<(Vec<MatchRecord>, LoadReport)> {
    let bytes = read_source(source)?;
    let (records, report) = parse_matches(bytes.as_slice(), options)?;
    info!(
        source,
        rows = report.rows_read,
        loaded = report.loaded,
        incomplete = report.incomplete,
        malformed = report.malformed,
        "Matches loaded"
    );
    Ok((records, report))
}

/// Like [`load_matches`], but a missing input yields an empty data set and
/// a warning instead of an error.
pub fn load_matches_or_empty(source: &str, options: &LoadOptions) -> Result<Vec<MatchRecord>> {
    match load_matches(source, options) {
        Ok((records, _)) => Ok(records),
        Err(MatchStatsError::MissingInput { path }) => {
            warn!(
                path = %path.display(),
                "Input file not found; place the results CSV there or pass --input. Continuing with no matches"
            );
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Normalized output layout, readable again by [`parse_matches`].
#[derive(Serialize)]
struct NormalizedRow<'a> {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Season")]
    season: Option<&'a str>,
    #[serde(rename = "HomeTeam")]
    home_team: &'a str,
    #[serde(rename = "AwayTeam")]
    away_team: &'a str,
    #[serde(rename = "FTHG")]
    home_goals: u32,
    #[serde(rename = "FTAG")]
    away_goals: u32,
    #[serde(rename = "FTR")]
    full_time_result: &'static str,
    #[serde(rename = "HTR")]
    half_time_result: Option<&'static str>,
    #[serde(rename = "HS")]
    home_shots: Option<u32>,
    #[serde(rename = "AS")]
    away_shots: Option<u32>,
    #[serde(rename = "HF")]
    home_fouls: Option<u32>,
    #[serde(rename = "AF")]
    away_fouls: Option<u32>,
    #[serde(rename = "HY")]
    home_yellow_cards: Option<u32>,
    #[serde(rename = "AY")]
    away_yellow_cards: Option<u32>,
    #[serde(rename = "HR")]
    home_red_cards: Option<u32>,
    #[serde(rename = "AR")]
    away_red_cards: Option<u32>,
    #[serde(rename = "xG_Home")]
    home_xg: Option<f64>,
    #[serde(rename = "xG_Away")]
    away_xg: Option<f64>,
    #[serde(rename = "GW")]
    gameweek: Option<u32>,
}

fn full_time_code(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Win => "H",
        Outcome::Draw => "D",
        Outcome::Loss => "A",
    }
}

impl<'a> From<&'a MatchRecord> for NormalizedRow<'a> {
    fn from(m: &'a MatchRecord) -> Self {
        let c = &m.counters;
        Self {
            date: m.date.map(|d| d.format("%Y-%m-%d").to_string()),
            season: m.season.as_deref(),
            home_team: &m.home_team,
            away_team: &m.away_team,
            home_goals: m.home_goals,
            away_goals: m.away_goals,
            full_time_result: full_time_code(m.home_outcome()),
            half_time_result: m.half_time_leader.map(HalfTimeLeader::code),
            home_shots: c.shots.home,
            away_shots: c.shots.away,
            home_fouls: c.fouls.home,
            away_fouls: c.fouls.away,
            home_yellow_cards: c.yellow_cards.home,
            away_yellow_cards: c.yellow_cards.away,
            home_red_cards: c.red_cards.home,
            away_red_cards: c.red_cards.away,
            home_xg: m.xg.map(|xg| xg.home),
            away_xg: m.xg.map(|xg| xg.away),
            gameweek: m.gameweek,
        }
    }
}

/// Writes `records` as CSV in the normalized layout.
pub fn write_matches<W: Write>(writer: W, records: &[MatchRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    for record in records {
        wtr.serialize(NormalizedRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> (Vec<MatchRecord>, LoadReport) {
        parse_matches(csv.as_bytes(), &LoadOptions::default()).unwrap()
    }

    #[test]
    fn test_parse_football_data_layout() {
        let csv = "\
Div,Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR,HTHG,HTAG,HTR,HS,AS,HY,AY
E0,09/08/19,Liverpool,Norwich,4,1,H,4,0,H,15,12,0,2
E0,17/08/19,Southampton,Liverpool,1,2,A,0,0,D,9,19,1,2
";
        let (records, report) = parse(csv);
        assert_eq!(report.loaded, 2);
        let first = &records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2019, 8, 9));
        assert_eq!(first.home_team, "Liverpool");
        assert_eq!(first.home_goals, 4);
        assert_eq!(first.half_time_leader, Some(HalfTimeLeader::Home));
        assert_eq!(first.counters.shots.total(), Some(27));
        assert_eq!(first.season_label().as_deref(), Some("2019/20"));
        assert_eq!(records[1].half_time_leader, Some(HalfTimeLeader::Level));
    }

    #[test]
    fn test_parse_premier_league_matches_layout() {
        let csv = "\
Season_End_Year,Wk,Date,Home,HomeGoals,AwayGoals,Away,FTR
2016,1,2015-08-09,Stoke City,0,1,Liverpool,A
";
        let (records, _) = parse(csv);
        assert_eq!(records[0].away_team, "Liverpool");
        assert_eq!(records[0].season.as_deref(), Some("2015/16"));
        assert_eq!(records[0].half_time_leader, None);
    }

    #[test]
    fn test_parse_epl_final_layout() {
        let csv = "\
Season,MatchDate,HomeTeam,AwayTeam,FullTimeHomeGoals,FullTimeAwayGoals,FullTimeResult,HalfTimeHomeGoals,HalfTimeAwayGoals,HalfTimeResult,HomeShots,AwayShots,HomeFouls,AwayFouls,HomeRedCards,AwayRedCards
2020-2021,2020-09-12,Liverpool,Leeds,4.0,3.0,H,3,2,H,20,6,7,9,0,0
";
        let (records, _) = parse(csv);
        let m = &records[0];
        assert_eq!(m.season.as_deref(), Some("2020/21"));
        assert_eq!((m.home_goals, m.away_goals), (4, 3));
        assert_eq!(m.counters.fouls.total(), Some(16));
        assert_eq!(m.counters.red_cards.total(), Some(0));
        assert_eq!(m.counters.yellow_cards.total(), None);
    }

    #[test]
    fn test_half_time_leader_from_goals() {
        let csv = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,HTHG,HTAG
2021-01-01,A,B,1,2,0,1
";
        let (records, _) = parse(csv);
        assert_eq!(records[0].half_time_leader, Some(HalfTimeLeader::Away));
    }

    #[test]
    fn test_incomplete_and_malformed_rows_are_skipped() {
        let csv = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG
2021-01-01,A,B,1,2
2021-01-02,,B,1,2
2021-01-03,A,B,,
2021-01-04,A,B,-1,0
2021-01-05,A,B,x,0
not-a-date,C,D,0,0
";
        let (records, report) = parse(csv);
        assert_eq!(report.rows_read, 6);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.incomplete, 2);
        assert_eq!(report.malformed, 2);
        assert_eq!(records[1].date, None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 3, 1);
        assert_eq!(parse_date("2020-03-01"), expected);
        assert_eq!(parse_date("01/03/2020"), expected);
        assert_eq!(parse_date("01/03/20"), expected);
        assert_eq!(parse_date("2020-03-01 15:00:00"), expected);
        assert_eq!(parse_date("2020-03-01T15:00:00"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some("3")), Ok(Some(3)));
        assert_eq!(parse_count(Some("3.0")), Ok(Some(3)));
        assert_eq!(parse_count(Some(" ")), Ok(None));
        assert_eq!(parse_count(None), Ok(None));
        assert!(parse_count(Some("2.5")).is_err());
        assert!(parse_count(Some("-1")).is_err());
        assert_eq!(parse_count(Some("1000")), Ok(Some(1000)));
        assert!(parse_count(Some("1001")).is_err());
        assert!(parse_count(Some("4294967295")).is_err());
        assert!(parse_count(Some("4294967296")).is_err());
    }

    #[test]
    fn test_huge_goal_count_is_malformed() {
        let csv = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG
2021-01-01,A,B,4294967295,1
2021-01-02,A,B,2,1
";
        let (records, report) = parse(csv);
        assert_eq!(report.malformed, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_goals(), 3);
    }

    #[test]
    fn test_unreadable_optional_columns_keep_row() {
        let csv = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,HTR,HS,AS,HTHG,HTAG
2021-01-08,Liverpool,Everton,1,0,H,NA,4,,
2021-01-09,Everton,Liverpool,0,2,Q,9,9,0,1
2021-01-10,Everton,Liverpool,0,2,Q,9,9,,
";
        let (records, report) = parse(csv);
        assert_eq!(report.malformed, 0);
        assert_eq!(report.loaded, 3);
        assert_eq!(records[0].counters.shots, SideCounts::new(None, Some(4)));
        assert_eq!(records[0].half_time_leader, Some(HalfTimeLeader::Home));
        // Unknown code falls back to the half-time score when present.
        assert_eq!(records[1].half_time_leader, Some(HalfTimeLeader::Away));
        assert_eq!(records[2].half_time_leader, None);
    }

    #[test]
    fn test_parse_expected_goals_layout() {
        let csv = "\
GW,Date,Home,Away,G_Home,G_Away,xG_Home,xG_Away
1,2020-09-12,Liverpool,Leeds United,4,3,3.2,0.3
2,2020-09-20,Chelsea,Liverpool,0,2,nan,1.6
";
        let (records, report) = parse(csv);
        assert_eq!(report.loaded, 2);
        let first = &records[0];
        assert_eq!((first.home_goals, first.away_goals), (4, 3));
        assert_eq!(first.gameweek, Some(1));
        assert_eq!(first.xg, Some(ExpectedGoals::new(3.2, 0.3)));
        assert_eq!(records[1].xg, None);
        assert_eq!(records[1].gameweek, Some(2));
    }

    #[test]
    fn test_parse_xg() {
        assert_eq!(parse_xg(Some("1.25")), Ok(Some(1.25)));
        assert_eq!(parse_xg(Some("")), Ok(None));
        assert!(parse_xg(Some("-0.1")).is_err());
        assert!(parse_xg(Some("inf")).is_err());
        assert!(parse_xg(Some("NaN")).is_err());
    }

    #[test]
    fn test_semicolon_delimiter() {
        let csv = "Date;HomeTeam;AwayTeam;FTHG;FTAG\n2021-01-01;A;B;1;2\n";
        let (records, _) = parse_matches(csv.as_bytes(), &LoadOptions { delimiter: b';' }).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_write_then_read_keeps_fields() {
        let csv = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,HTR,HS,AS
2021-01-01,A,B,1,2,A,10,11
";
        let (records, _) = parse(csv);
        let mut out = Vec::new();
        write_matches(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Date,Season,HomeTeam,AwayTeam,FTHG,FTAG,FTR,HTR"));

        let (reloaded, _) = parse(&text);
        assert_eq!(reloaded, records);
    }

    #[test]
    fn test_written_full_time_result_follows_score() {
        let records = vec![
            MatchRecord::new(None, "A", "B", 0, 2).with_half_time_leader(HalfTimeLeader::Level),
            MatchRecord::new(None, "A", "B", 1, 1),
            MatchRecord::new(None, "A", "B", 3, 0).with_xg(2.1, 0.4),
        ];
        let mut out = Vec::new();
        write_matches(&mut out, &records).unwrap();

        let mut rdr = csv::Reader::from_reader(out.as_slice());
        let headers = rdr.headers().unwrap().clone();
        let ftr = headers.iter().position(|h| h == "FTR").unwrap();
        let htr = headers.iter().position(|h| h == "HTR").unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        let codes: Vec<_> = rows.iter().map(|r| (&r[ftr], &r[htr])).collect();
        assert_eq!(codes, [("A", "D"), ("D", ""), ("H", "")]);

        let (reloaded, _) = parse_matches(out.as_slice(), &LoadOptions::default()).unwrap();
        assert_eq!(reloaded, records);
    }
}
