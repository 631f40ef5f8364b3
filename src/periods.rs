//! Date bucketing into caller-defined periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MatchStatsError, Result};

/// Label given to records without a usable date.
pub const UNKNOWN_PERIOD: &str = "Unknown";

/// How a date is compared against a period's cutoff.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryRule {
    /// `date < cutoff` stays in the period; the cutoff day opens the next one.
    #[default]
    Exclusive,
    /// `date <= cutoff` stays in the period.
    Inclusive,
}

impl BoundaryRule {
    fn before(self, date: NaiveDate, cutoff: NaiveDate) -> bool {
        match self {
            BoundaryRule::Exclusive => date < cutoff,
            BoundaryRule::Inclusive => date <= cutoff,
        }
    }
}

/// One bucket; `until: None` means open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub label: String,
    #[serde(default)]
    pub until: Option<NaiveDate>,
}

impl Period {
    pub fn until(label: impl Into<String>, cutoff: NaiveDate) -> Self {
        Self {
            label: label.into(),
            until: Some(cutoff),
        }
    }

    pub fn open(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            until: None,
        }
    }
}

/// An ordered, validated list of periods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodScheme {
    periods: Vec<Period>,
    rule: BoundaryRule,
}

impl PeriodScheme {
    /// Validates that the scheme is non-empty, cutoffs strictly increase and
    /// only the last period is open-ended.
    pub fn new(periods: Vec<Period>, rule: BoundaryRule) -> Result<Self> {
        if periods.is_empty() {
            return Err(invalid("at least one period is required"));
        }

        let last = periods.len() - 1;
        let mut previous: Option<NaiveDate> = None;
        for (i, period) in periods.iter().enumerate() {
            if period.label.trim().is_empty() {
                return Err(invalid(format!("period {i} has an empty label")));
            }
            match period.until {
                Some(cutoff) => {
                    if previous.is_some_and(|p| cutoff <= p) {
                        return Err(invalid(format!(
                            "cutoff {cutoff} for '{}' is not after the previous cutoff",
                            period.label
                        )));
                    }
                    previous = Some(cutoff);
                }
                None if i != last => {
                    return Err(invalid(format!(
                        "only the last period may be open-ended, '{}' is not last",
                        period.label
                    )));
                }
                None => {}
            }
        }

        Ok(Self { periods, rule })
    }

    /// Pre-COVID / During COVID / Post-COVID, split at 2020-03-01 and 2021-07-01.
    pub fn covid() -> Self {
        Self {
            periods: vec![
                Period::until("Pre-COVID", ymd(2020, 3, 1)),
                Period::until("During COVID", ymd(2021, 7, 1)),
                Period::open("Post-COVID"),
            ],
            rule: BoundaryRule::Exclusive,
        }
    }

    pub fn with_rule(mut self, rule: BoundaryRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn rule(&self) -> BoundaryRule {
        self.rule
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Position of `label` in the scheme; unknown labels sort last.
    pub fn rank(&self, label: &str) -> usize {
        self.periods
            .iter()
            .position(|p| p.label == label)
            .unwrap_or(self.periods.len())
    }
}

impl Default for PeriodScheme {
    fn default() -> Self {
        Self::covid()
    }
}

/// Label of the first period whose cutoff `date` falls before, else the
/// final label. A missing date is [`UNKNOWN_PERIOD`].
pub fn assign_period_label(date: Option<NaiveDate>, scheme: &PeriodScheme) -> &str {
    let Some(date) = date else {
        return UNKNOWN_PERIOD;
    };

    for period in &scheme.periods {
        match period.until {
            Some(cutoff) if scheme.rule.before(date, cutoff) => return &period.label,
            Some(_) => continue,
            None => return &period.label,
        }
    }

    // `new` guarantees at least one period.
    scheme
        .periods
        .last()
        .map_or(UNKNOWN_PERIOD, |p| p.label.as_str())
}

fn invalid(reason: impl Into<String>) -> MatchStatsError {
    MatchStatsError::InvalidPeriods {
        reason: reason.into(),
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}
