//! Aggregation of classified matches into summary tables.
//!
//! Records are grouped by any combination of [`GroupKey`]s and reduced to
//! win/draw/loss summaries, half-time conversion and comeback rates, or
//! per-match trend averages. League-wide tables that need no tracked team
//! live in [`rankings`] and [`xg`].

pub mod aggregate;
pub mod rankings;
pub mod rates;
pub mod trends;
pub mod types;
pub mod utility;
pub mod xg;

pub use aggregate::summarize;
pub use rates::{comeback, comeback_rate, conversion, conversion_rate, rate_table};
pub use types::{GroupKey, Percent, RateKind, RateRow, RateStat, SummaryRow, TrendRow};
pub use xg::{XgRow, xg_table};
