//! Match-outcome and half-time conversion statistics for football results.
//!
//! Load results with [`parser`], classify them for one team with
//! [`classify::Classifier`], then aggregate with [`analyzers`].

pub mod analyzers;
pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod managers;
pub mod output;
pub mod parser;
pub mod periods;
pub mod record;

pub use classify::{ClassifiedRecord, Classifier, classify_result, classify_venue};
pub use error::{MatchStatsError, Result};
pub use periods::{BoundaryRule, Period, PeriodScheme, assign_period_label};
pub use record::{ExpectedGoals, HalfTimeLeader, MatchRecord, Outcome, Venue};
