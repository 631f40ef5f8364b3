//! CLI entry point for the match statistics tool.
//!
//! Provides subcommands for a tracked team's results summary and half-time
//! rates, league-wide rankings, trends and expected-goals tables, manager
//! tenures, and extracting a team's matches into a normalized CSV.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use match_stats::analyzers::rankings::{team_rate_rankings, venue_splits};
use match_stats::analyzers::trends::{league_trends_by_season, match_trends};
use match_stats::analyzers::{GroupKey, RateKind, rate_table, summarize, xg_table};
use match_stats::config::{resolve_scheme, resolve_team};
use match_stats::filter::MatchFilter;
use match_stats::managers::load_managers;
use match_stats::output::{Table, Tabular, save_csv, to_json};
use match_stats::parser::{LoadOptions, load_matches, load_matches_or_empty, write_matches};
use match_stats::{BoundaryRule, Classifier, MatchRecord, PeriodScheme};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "match_stats")]
#[command(about = "Win/draw/loss and half-time conversion statistics from football results CSVs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Results CSV: a path or URL, optionally gzipped
    #[arg(short, long, value_name = "FILE_OR_URL", default_value = "data/matches.csv")]
    input: String,

    /// Field delimiter of the input
    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

impl InputArgs {
    fn options(&self) -> Result<LoadOptions> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character");
        }
        Ok(LoadOptions {
            delimiter: self.delimiter as u8,
        })
    }
}

#[derive(Args, Debug)]
struct TeamArgs {
    /// Team to analyze (defaults to $MATCH_STATS_TEAM)
    #[arg(short, long)]
    team: Option<String>,

    /// Period-scheme JSON file (defaults to $MATCH_STATS_PERIODS, else the COVID periods)
    #[arg(long, value_name = "FILE")]
    periods: Option<PathBuf>,

    /// Count a match played on a cutoff date in the earlier period
    #[arg(long, default_value_t = false)]
    inclusive: bool,
}

impl TeamArgs {
    fn team(&self) -> Result<String> {
        match resolve_team(self.team.clone()) {
            Some(team) => Ok(team),
            None => bail!("no team given: pass --team or set MATCH_STATS_TEAM"),
        }
    }

    fn scheme(&self) -> Result<PeriodScheme> {
        let scheme = resolve_scheme(self.periods.as_deref())?;
        Ok(if self.inclusive {
            scheme.with_rule(BoundaryRule::Inclusive)
        } else {
            scheme
        })
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append CSV rows to an existing output file
    #[arg(long, default_value_t = false)]
    append: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Win/draw/loss summary of a team's matches per group
    Summarize {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        team: TeamArgs,
        /// Comma-separated grouping: venue, period, season, year, opponent, outcome
        #[arg(short, long, value_delimiter = ',', default_value = "venue,period")]
        group_by: Vec<GroupKey>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Half-time lead conversion or comeback rate of a team per group
    Leads {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        team: TeamArgs,
        /// conversion or comeback
        #[arg(short, long, default_value = "conversion")]
        rate: RateKind,
        #[arg(short, long, value_delimiter = ',', default_value = "period")]
        group_by: Vec<GroupKey>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// League-wide team rankings by half-time rate, or home/away records
    Rankings {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long, default_value = "conversion")]
        rate: RateKind,
        /// Leave out teams with fewer opportunities
        #[arg(short, long, default_value_t = 1)]
        min_opportunities: u32,
        /// Only show this many teams
        #[arg(long)]
        top: Option<usize>,
        /// Rank from the worst rate instead
        #[arg(long, default_value_t = false)]
        bottom: bool,
        /// Show each team's home and away records instead of rates
        #[arg(long, default_value_t = false)]
        venues: bool,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Per-match averages: goals, margins, shots and cards
    Trends {
        #[command(flatten)]
        input: InputArgs,
        /// Restrict to one team's matches, grouped by --group-by
        #[arg(short, long)]
        team: Option<String>,
        /// Period-scheme JSON file; only used with a team
        #[arg(long, value_name = "FILE")]
        periods: Option<PathBuf>,
        /// Grouping for a team's trends (default: season); league trends are always per season
        #[arg(short, long, value_delimiter = ',')]
        group_by: Vec<GroupKey>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Expected goals for and against per team, from xG_Home/xG_Away columns
    Xg {
        #[command(flatten)]
        input: InputArgs,
        /// Only count matches from gameweeks before this one
        #[arg(long, value_name = "GW")]
        before_gameweek: Option<u32>,
        /// Only show this many teams
        #[arg(long)]
        top: Option<usize>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Manager tenures from a `;`-separated Name;From;To;P;W;D;L;win_perc file
    Managers {
        #[arg(short, long, value_name = "FILE_OR_URL")]
        input: String,
        /// End date for a tenure that is still running (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Write a team's matches within a season or date range as normalized CSV
    Extract {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long)]
        team: Option<String>,
        /// First season by end year, e.g. 2015 for 2014/15
        #[arg(long)]
        first_season: Option<i32>,
        #[arg(long)]
        last_season: Option<i32>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Output CSV (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            input,
            team,
            group_by,
            out,
        } => summarize_cmd(&input, &team, &group_by, &out),
        Commands::Leads {
            input,
            team,
            rate,
            group_by,
            out,
        } => leads_cmd(&input, &team, rate, &group_by, &out),
        Commands::Rankings {
            input,
            rate,
            min_opportunities,
            top,
            bottom,
            venues,
            out,
        } => rankings_cmd(&input, rate, min_opportunities, top, bottom, venues, &out),
        Commands::Trends {
            input,
            team,
            periods,
            group_by,
            out,
        } => {
            let team = TeamArgs {
                team,
                periods,
                inclusive: false,
            };
            trends_cmd(&input, &team, &group_by, &out)
        }
        Commands::Xg {
            input,
            before_gameweek,
            top,
            out,
        } => xg_cmd(&input, before_gameweek, top, &out),
        Commands::Managers { input, as_of, out } => {
            let reference = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
            let tenures = load_managers(&input, reference)?;
            emit(&tenures, &[], &out)
        }
        Commands::Extract {
            input,
            team,
            first_season,
            last_season,
            from,
            to,
            output,
        } => {
            let mut filter = MatchFilter::default()
                .seasons(first_season, last_season)
                .dates(from, to);
            filter.team = resolve_team(team);
            extract_cmd(&input, &filter, output.as_deref())
        }
    }
}

/// Coloured stderr output plus a JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/match_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("match_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

fn load(input: &InputArgs) -> Result<Vec<MatchRecord>> {
    let matches = load_matches_or_empty(&input.input, &input.options()?)
        .with_context(|| format!("loading {}", input.input))?;
    if matches.is_empty() {
        warn!(input = %input.input, "No matches to analyze");
    }
    Ok(matches)
}

#[tracing::instrument(skip_all, fields(input = %input.input, team = ?team.team))]
fn summarize_cmd(
    input: &InputArgs,
    team: &TeamArgs,
    group_by: &[GroupKey],
    out: &OutputArgs,
) -> Result<()> {
    let matches = load(input)?;
    let scheme = team.scheme()?;
    let classifier = Classifier::new(team.team()?, &scheme);
    let classified = classifier.classify_all(&matches);

    let rows = summarize(&classified, group_by);
    info!(
        team = classifier.tracked_team(),
        matches = classified.len(),
        groups = rows.len(),
        "Summary computed"
    );
    emit(&rows, group_by, out)
}

#[tracing::instrument(skip_all, fields(input = %input.input, team = ?team.team, rate = ?rate))]
fn leads_cmd(
    input: &InputArgs,
    team: &TeamArgs,
    rate: RateKind,
    group_by: &[GroupKey],
    out: &OutputArgs,
) -> Result<()> {
    let matches = load(input)?;
    let scheme = team.scheme()?;
    let classified = Classifier::new(team.team()?, &scheme).classify_all(&matches);

    let with_half_time = classified
        .iter()
        .filter(|c| c.record.half_time_leader.is_some())
        .count();
    if with_half_time == 0 && !classified.is_empty() {
        warn!("Input has no half-time results; rates are unavailable");
    }

    let rows = rate_table(&classified, group_by, rate);
    emit(&rows, group_by, out)
}

#[tracing::instrument(skip(input, out), fields(input = %input.input))]
fn rankings_cmd(
    input: &InputArgs,
    rate: RateKind,
    min_opportunities: u32,
    top: Option<usize>,
    bottom: bool,
    venues: bool,
    out: &OutputArgs,
) -> Result<()> {
    let matches = load(input)?;

    if venues {
        let mut rows = venue_splits(&matches);
        if let Some(n) = top {
            rows.truncate(n);
        }
        return emit(&rows, &[], out);
    }

    let mut rows = team_rate_rankings(&matches, rate, min_opportunities);
    if bottom {
        rows.reverse();
    }
    if let Some(n) = top {
        rows.truncate(n);
    }
    info!(teams = rows.len(), "Rankings computed");
    emit(&rows, &[], out)
}

#[tracing::instrument(skip_all, fields(input = %input.input, team = ?team.team))]
fn trends_cmd(
    input: &InputArgs,
    team: &TeamArgs,
    group_by: &[GroupKey],
    out: &OutputArgs,
) -> Result<()> {
    let matches = load(input)?;

    match resolve_team(team.team.clone()) {
        Some(tracked) => {
            let group_by = team_trend_grouping(group_by);
            let scheme = team.scheme()?;
            let classified = Classifier::new(tracked, &scheme).classify_all(&matches);
            emit(&match_trends(&classified, &group_by), &group_by, out)
        }
        None => {
            let ignored = ignored_league_flags(group_by, team.periods.as_deref());
            if !ignored.is_empty() {
                warn!(
                    flags = ?ignored,
                    "No team given; league trends are grouped by season and these flags are ignored"
                );
            }
            emit(&league_trends_by_season(&matches), &[GroupKey::Season], out)
        }
    }
}

fn team_trend_grouping(group_by: &[GroupKey]) -> Vec<GroupKey> {
    if group_by.is_empty() {
        vec![GroupKey::Season]
    } else {
        group_by.to_vec()
    }
}

/// Trend flags that only apply to a tracked team.
fn ignored_league_flags(group_by: &[GroupKey], periods: Option<&Path>) -> Vec<&'static str> {
    let mut ignored = Vec::new();
    if !group_by.is_empty() {
        ignored.push("--group-by");
    }
    if periods.is_some() {
        ignored.push("--periods");
    }
    ignored
}

#[tracing::instrument(skip(input, out), fields(input = %input.input))]
fn xg_cmd(
    input: &InputArgs,
    before_gameweek: Option<u32>,
    top: Option<usize>,
    out: &OutputArgs,
) -> Result<()> {
    let matches = load(input)?;

    let with_xg = matches.iter().filter(|m| m.xg.is_some()).count();
    if with_xg == 0 && !matches.is_empty() {
        warn!("Input has no xG_Home/xG_Away values; the table is empty");
    }

    let mut rows = xg_table(&matches, before_gameweek);
    if let Some(n) = top {
        rows.truncate(n);
    }
    info!(teams = rows.len(), matches_with_xg = with_xg, "xG table computed");
    emit(&rows, &[], out)
}

#[tracing::instrument(skip_all, fields(input = %input.input))]
fn extract_cmd(input: &InputArgs, filter: &MatchFilter, output: Option<&Path>) -> Result<()> {
    // A missing input is an error here; there is nothing to extract.
    let (matches, _) = load_matches(&input.input, &input.options()?)
        .with_context(|| format!("loading {}", input.input))?;
    let kept = filter.apply(&matches);

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_matches(file, &kept)?;
        }
        None => write_matches(std::io::stdout().lock(), &kept)?,
    }

    info!(total = matches.len(), kept = kept.len(), "Matches extracted");
    Ok(())
}

fn emit<T: Tabular + Serialize>(rows: &[T], group_by: &[GroupKey], out: &OutputArgs) -> Result<()> {
    match (out.format, &out.output) {
        (Format::Csv, Some(path)) => save_csv(path, &Table::build(group_by, rows), out.append)?,
        (Format::Csv, None) => Table::build(group_by, rows).write_csv(std::io::stdout().lock(), true)?,
        (format, path) => {
            let text = match format {
                Format::Json => to_json(rows)?,
                _ => Table::build(group_by, rows).render(),
            };
            match path {
                Some(path) => std::fs::write(path, text)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", text.trim_end()),
            }
        }
    }
    Ok(())
}
