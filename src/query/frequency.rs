//! Top-K base command frequency

use crate::types::{FrequencyEntry, Record};

use super::rank_by_count;

/// Most frequent base commands among records at or after `since`
///
/// `since = 0` covers the whole history. Ties keep the order in which the
/// commands were first seen.
pub fn frequency<I>(records: I, since: i64, limit: usize) -> Vec<FrequencyEntry>
where
    I: IntoIterator<Item = Record>,
{
    let keys = records
        .into_iter()
        .filter(|r| since == 0 || r.timestamp >= since)
        .map(|r| r.base_command);

    rank_by_count(keys)
        .into_iter()
        .take(limit)
        .map(|(command, count)| FrequencyEntry { command, count })
        .collect()
}
