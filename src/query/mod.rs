//! Query Engine - read-only reports over the history
//!
//! Every query takes the record stream produced by
//! [`EventStore::scan`](crate::event_store::EventStore::scan) and never
//! touches the store itself:
//! - `frequency`: top base commands in a lookback window
//! - `timeline`: runs of one base command per time bucket
//! - `detail`: distinct full command lines of one base command
//! - `stats`: totals and daily rate

mod detail;
mod frequency;
mod period;
mod stats;
mod timeline;

use std::collections::HashMap;

pub use detail::detail;
pub use frequency::frequency;
pub use period::{Granularity, ParsePeriodError, Period};
pub use stats::stats;
pub use timeline::{timeline, timeline_in};

/// Count keys and sort by count descending
///
/// Equal counts keep first-seen order, so the result is deterministic for
/// a given input stream.
pub(crate) fn rank_by_count<I>(keys: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    // key -> (count, first seen position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, key) in keys.into_iter().enumerate() {
        counts.entry(key).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(key, (count, first_seen))| (key, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .map(|(key, count, _)| (key, count))
        .collect()
}
