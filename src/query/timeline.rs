//! Time-bucketed usage of one base command

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{Local, TimeZone};

use crate::types::{Record, TimelineBucket};

use super::Granularity;

/// Runs of `command` per bucket, labels in the local timezone
pub fn timeline<I>(records: I, command: &str, granularity: Granularity) -> Vec<TimelineBucket>
where
    I: IntoIterator<Item = Record>,
{
    timeline_in(records, command, granularity, &Local)
}

/// Runs of `command` per bucket, labels in `tz`
///
/// Buckets come back sorted by label; every label format sorts in time
/// order, so this is chronological.
pub fn timeline_in<I, Tz>(
    records: I,
    command: &str,
    granularity: Granularity,
    tz: &Tz,
) -> Vec<TimelineBucket>
where
    I: IntoIterator<Item = Record>,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let format = granularity.label_format();
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();

    for record in records {
        if record.base_command != command {
            continue;
        }
        // Out-of-range timestamps have no label
        let Some(at) = tz.timestamp_opt(record.timestamp, 0).single() else {
            continue;
        };
        *buckets.entry(at.format(format).to_string()).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|(label, count)| TimelineBucket { label, count })
        .collect()
}
