use crate::analyzers::types::{GroupKey, SummaryRow, Tally};
use crate::classify::ClassifiedRecord;
use crate::periods::UNKNOWN_PERIOD;
use chrono::Datelike;
use std::collections::BTreeMap;

/// One component of a group key. Orders by `rank` first so venues and
/// periods come out in their natural order rather than alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct KeyPart {
    rank: usize,
    label: String,
}

impl KeyPart {
    fn new(rank: usize, label: impl Into<String>) -> Self {
        Self {
            rank,
            label: label.into(),
        }
    }

    fn ordered(label: Option<String>) -> Self {
        match label {
            Some(label) => Self::new(0, label),
            None => Self::new(1, UNKNOWN_PERIOD),
        }
    }
}

pub(crate) fn key_part(record: &ClassifiedRecord<'_>, key: GroupKey) -> KeyPart {
    match key {
        GroupKey::Venue => KeyPart::new(record.venue as usize, record.venue.as_str()),
        GroupKey::Period => KeyPart::new(record.period_rank, record.period_label.as_str()),
        GroupKey::Season => KeyPart::ordered(record.season()),
        GroupKey::Year => KeyPart::ordered(record.record.date.map(|d| d.year().to_string())),
        GroupKey::Opponent => KeyPart::new(0, record.opponent()),
        GroupKey::Outcome => KeyPart::new(record.outcome as usize, record.outcome.as_str()),
    }
}

/// Buckets records by the Cartesian combination of `group_by`. Only
/// combinations that occur are present; iteration order is deterministic.
pub(crate) fn group_records<'r, 'a>(
    records: &'r [ClassifiedRecord<'a>],
    group_by: &[GroupKey],
) -> BTreeMap<Vec<KeyPart>, Vec<&'r ClassifiedRecord<'a>>> {
    let mut groups: BTreeMap<Vec<KeyPart>, Vec<&ClassifiedRecord<'a>>> = BTreeMap::new();
    for record in records {
        let key = group_by.iter().map(|k| key_part(record, *k)).collect();
        groups.entry(key).or_default().push(record);
    }
    groups
}

pub(crate) fn labels(key: Vec<KeyPart>) -> Vec<String> {
    key.into_iter().map(|p| p.label).collect()
}

/// Win/draw/loss summary of `records` per group.
///
/// An empty `group_by` produces a single overall row (when there are records).
pub fn summarize(records: &[ClassifiedRecord<'_>], group_by: &[GroupKey]) -> Vec<SummaryRow> {
    group_records(records, group_by)
        .into_iter()
        .map(|(key, members)| {
            let mut tally = Tally::default();
            for r in members {
                tally.record(r.outcome, r.goals_for, r.goals_against);
            }
            SummaryRow::from_tally(labels(key), &tally)
        })
        .collect()
}
