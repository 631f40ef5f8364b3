//! Output formatting and persistence for aggregated tables.
//!
//! Supports aligned text tables, pretty JSON, and CSV files (optionally
//! appended to).

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::{
    GroupKey, RateRow, SummaryRow, Tally, TeamRate, TrendRow, VenueSplit,
};
use crate::analyzers::xg::XgRow;
use crate::managers::ManagerTenure;

/// Rows that can be laid out as a table.
///
/// Grouped rows put their group-key labels first; the caller supplies the
/// names of those key columns.
pub trait Tabular {
    fn columns() -> Vec<&'static str>;

    fn key(&self) -> &[String] {
        &[]
    }

    fn cells(&self) -> Vec<String>;
}

fn opt2(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

impl Tabular for SummaryRow {
    fn columns() -> Vec<&'static str> {
        vec![
            "matches", "wins", "draws", "losses", "gf", "ga", "gd", "points", "win_pct",
        ]
    }

    fn key(&self) -> &[String] {
        &self.group_key
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.match_count.to_string(),
            self.win_count.to_string(),
            self.draw_count.to_string(),
            self.loss_count.to_string(),
            self.goals_for.to_string(),
            self.goals_against.to_string(),
            self.goal_difference().to_string(),
            self.points.to_string(),
            self.win_percentage().to_string(),
        ]
    }
}

impl Tabular for RateRow {
    fn columns() -> Vec<&'static str> {
        vec!["opportunities", "successes", "rate_pct"]
    }

    fn key(&self) -> &[String] {
        &self.group_key
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.stat.opportunities.to_string(),
            self.stat.successes.to_string(),
            self.stat.rate.to_string(),
        ]
    }
}

impl Tabular for TeamRate {
    fn columns() -> Vec<&'static str> {
        vec!["team", "opportunities", "successes", "rate_pct"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.team.clone(),
            self.stat.opportunities.to_string(),
            self.stat.successes.to_string(),
            self.stat.rate.to_string(),
        ]
    }
}

impl Tabular for TrendRow {
    fn columns() -> Vec<&'static str> {
        vec![
            "matches",
            "avg_goals",
            "goals_stddev",
            "avg_margin",
            "avg_shots",
            "avg_fouls",
            "avg_yellows",
            "avg_reds",
            "shot_conv_pct",
        ]
    }

    fn key(&self) -> &[String] {
        &self.group_key
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.match_count.to_string(),
            opt2(self.avg_total_goals),
            opt2(self.total_goals_stddev),
            opt2(self.avg_win_margin),
            opt2(self.avg_total_shots),
            opt2(self.avg_total_fouls),
            opt2(self.avg_yellow_cards),
            opt2(self.avg_red_cards),
            self.shot_conversion.to_string(),
        ]
    }
}

fn tally_cells(tally: &Tally) -> [String; 5] {
    [
        tally.wins.to_string(),
        tally.draws.to_string(),
        tally.losses.to_string(),
        tally.win_percentage().to_string(),
        opt2(tally.avg_goals_for()),
    ]
}

impl Tabular for VenueSplit {
    fn columns() -> Vec<&'static str> {
        vec![
            "team",
            "home_w",
            "home_d",
            "home_l",
            "home_win_pct",
            "home_avg_gf",
            "away_w",
            "away_d",
            "away_l",
            "away_win_pct",
            "away_avg_gf",
        ]
    }

    fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.team.clone()];
        cells.extend(tally_cells(&self.home));
        cells.extend(tally_cells(&self.away));
        cells
    }
}

impl Tabular for XgRow {
    fn columns() -> Vec<&'static str> {
        vec![
            "team",
            "matches",
            "xg",
            "xga",
            "xg_pm",
            "xga_pm",
            "delta_pm",
            "home_xg_pm",
            "away_xg_pm",
            "home_xg_diff",
            "goals_pm",
            "goals_minus_xg",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.team.clone(),
            self.matches.to_string(),
            format!("{:.2}", self.xg),
            format!("{:.2}", self.xga),
            format!("{:.2}", self.xg_per_match),
            format!("{:.2}", self.xga_per_match),
            format!("{:.2}", self.delta_per_match),
            opt2(self.home_xg_per_match),
            opt2(self.away_xg_per_match),
            opt2(self.home_xg_diff),
            format!("{:.2}", self.goals_per_match),
            format!("{:.2}", self.goals_minus_xg),
        ]
    }
}

impl Tabular for ManagerTenure {
    fn columns() -> Vec<&'static str> {
        vec![
            "name", "from", "to", "days", "years", "played", "wins", "draws", "losses", "win_pct",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.from.to_string(),
            self.to.map_or_else(|| "-".to_string(), |d| d.to_string()),
            self.days.to_string(),
            format!("{:.1}", self.years),
            self.played.to_string(),
            self.wins.to_string(),
            self.draws.to_string(),
            self.losses.to_string(),
            self.win_perc.to_string(),
        ]
    }
}

/// Header plus stringified rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    key_columns: usize,
}

impl Table {
    /// Lays out `rows`, naming the leading key columns after `group_by`.
    pub fn build<T: Tabular>(group_by: &[GroupKey], rows: &[T]) -> Self {
        let mut headers: Vec<String> = group_by.iter().map(|k| k.as_str().to_string()).collect();
        headers.extend(T::columns().into_iter().map(String::from));

        let rows = rows
            .iter()
            .map(|row| {
                let mut cells = row.key().to_vec();
                cells.extend(row.cells());
                cells
            })
            .collect();

        Self {
            headers,
            rows,
            key_columns: group_by.len(),
        }
    }

    /// Aligned plain-text rendering; key columns left-aligned, values right.
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(String::len).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, &w))| {
                    if i < self.key_columns {
                        format!("{cell:<w$}")
                    } else {
                        format!("{cell:>w$}")
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = line(&self.headers);
        out.push('\n');
        let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(rule_len));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        out
    }

    /// Writes the table as CSV to `writer`.
    pub fn write_csv<W: Write>(&self, writer: W, with_header: bool) -> Result<()> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
        if with_header {
            wtr.write_record(&self.headers)?;
        }
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Serializes rows as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(rows: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Writes `table` to a CSV file, replacing it, or appending rows when
/// `append` is set.
///
/// When appending, the header is only written if the file does not exist yet.
pub fn save_csv(path: &Path, table: &Table, append: bool) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, append, "Writing CSV table");

    let file = if append {
        OpenOptions::new().append(true).create(true).open(path)?
    } else {
        std::fs::File::create(path)?
    };

    table.write_csv(file, !(append && file_exists))
}
