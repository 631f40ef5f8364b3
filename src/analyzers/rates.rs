//! Half-time lead conversion and comeback rates for the tracked team.

use crate::analyzers::aggregate::{group_records, labels};
use crate::analyzers::types::{GroupKey, Percent, RateKind, RateRow, RateStat};
use crate::classify::ClassifiedRecord;
use crate::record::Outcome;

/// Whether `record` is an opportunity for `kind`; `None` when the half-time
/// state is unknown.
fn is_opportunity(record: &ClassifiedRecord<'_>, kind: RateKind) -> Option<bool> {
    match kind {
        RateKind::Conversion => record.led_at_half_time(),
        RateKind::Comeback => record.trailed_at_half_time(),
    }
}

/// Opportunities and wins among `records` for `kind`.
pub fn rate_stat<'r, 'a: 'r, I>(records: I, kind: RateKind) -> RateStat
where
    I: IntoIterator<Item = &'r ClassifiedRecord<'a>>,
{
    let mut stat = RateStat::default();
    for record in records {
        if is_opportunity(record, kind) == Some(true) {
            stat.record(record.outcome == Outcome::Win);
        }
    }
    stat
}

/// Half-time leads held to a full-time win.
pub fn conversion(records: &[ClassifiedRecord<'_>]) -> RateStat {
    rate_stat(records, RateKind::Conversion)
}

/// Half-time deficits turned into a full-time win.
pub fn comeback(records: &[ClassifiedRecord<'_>]) -> RateStat {
    rate_stat(records, RateKind::Comeback)
}

/// Percentage of half-time leads converted into wins; [`Percent::NO_DATA`]
/// when the team never led at half time.
pub fn conversion_rate(records: &[ClassifiedRecord<'_>]) -> Percent {
    conversion(records).rate
}

/// Percentage of half-time deficits turned into wins; [`Percent::NO_DATA`]
/// when the team never trailed at half time.
pub fn comeback_rate(records: &[ClassifiedRecord<'_>]) -> Percent {
    comeback(records).rate
}

/// `kind` rate per group. Groups without any opportunity are left out.
pub fn rate_table(
    records: &[ClassifiedRecord<'_>],
    group_by: &[GroupKey],
    kind: RateKind,
) -> Vec<RateRow> {
    group_records(records, group_by)
        .into_iter()
        .filter_map(|(key, members)| {
            let stat = rate_stat(members, kind);
            (stat.opportunities > 0).then(|| RateRow {
                group_key: labels(key),
                stat,
            })
        })
        .collect()
}
