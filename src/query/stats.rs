//! Summary statistics over the history

use std::collections::HashSet;

use crate::types::{HistoryStats, Record};
use crate::utils::SECONDS_PER_DAY;

/// Record count, distinct base commands, and daily rate
///
/// The tracked span runs from the first record to the last record in file
/// order, not from the minimum to the maximum timestamp. When writers
/// interleave out of timestamp order the span can be short or negative;
/// the average is then reported as 0.
pub fn stats<I>(records: I) -> HistoryStats
where
    I: IntoIterator<Item = Record>,
{
    let mut total_records: usize = 0;
    let mut commands: HashSet<String> = HashSet::new();
    let mut first_timestamp: Option<i64> = None;
    let mut last_timestamp: Option<i64> = None;

    for record in records {
        total_records += 1;
        first_timestamp.get_or_insert(record.timestamp);
        last_timestamp = Some(record.timestamp);
        commands.insert(record.base_command);
    }

    let days_tracked = match (first_timestamp, last_timestamp) {
        // Widened before subtracting; any pair of i64 timestamps is valid
        (Some(first), Some(last)) => (last as f64 - first as f64) / SECONDS_PER_DAY as f64,
        _ => 0.0,
    };

    let average_per_day = if days_tracked > 0.0 {
        total_records as f64 / days_tracked
    } else {
        0.0
    };

    HistoryStats {
        total_records,
        unique_base_commands: commands.len(),
        days_tracked,
        average_per_day,
        first_timestamp,
        last_timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: i64, command: &str) -> Record {
        Record::new(timestamp, command).unwrap()
    }

    #[test]
    fn test_stats_arithmetic() {
        let mut input: Vec<Record> = (0..9).map(|i| record(i * 1000, "ls")).collect();
        input.push(record(864_000, "git status"));

        let stats = stats(input);

        assert_eq!(stats.total_records, 10);
        assert_eq!(stats.unique_base_commands, 2);
        assert_eq!(stats.days_tracked, 10.0);
        assert_eq!(stats.average_per_day, 1.0);
        assert_eq!(stats.first_timestamp, Some(0));
        assert_eq!(stats.last_timestamp, Some(864_000));
    }

    #[test]
    fn test_stats_uses_file_order() {
        // Last record in the file is older than the first
        let input = vec![record(864_000, "ls"), record(0, "ls")];

        let stats = stats(input);

        assert_eq!(stats.days_tracked, -10.0);
        assert_eq!(stats.average_per_day, 0.0);
    }

    #[test]
    fn test_stats_single_day() {
        let stats = stats(vec![record(100, "ls"), record(100, "pwd")]);
        assert_eq!(stats.days_tracked, 0.0);
        assert_eq!(stats.average_per_day, 0.0);
    }

    #[test]
    fn test_stats_extreme_timestamps() {
        let stats = stats(vec![record(i64::MIN, "ls"), record(i64::MAX, "ls")]);

        let expected = (i64::MAX as f64 - i64::MIN as f64) / 86_400.0;
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.days_tracked, expected);
        assert!(stats.days_tracked > 0.0);
        assert!(stats.average_per_day > 0.0);

        let reversed = super::stats(vec![record(i64::MAX, "ls"), record(i64::MIN, "ls")]);
        assert_eq!(reversed.days_tracked, -expected);
        assert_eq!(reversed.average_per_day, 0.0);
    }

    #[test]
    fn test_stats_empty() {
        let stats = stats(Vec::new());
        assert_eq!(stats, HistoryStats::default());
    }
}
