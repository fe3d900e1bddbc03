//! Per-variant breakdown of one base command

use crate::types::{DetailEntry, DetailReport, Record};

use super::rank_by_count;

/// Distinct full command lines under `command`, most frequent first
pub fn detail<I>(records: I, command: &str, limit: usize) -> DetailReport
where
    I: IntoIterator<Item = Record>,
{
    let ranked = rank_by_count(
        records
            .into_iter()
            .filter(|r| r.base_command == command)
            .map(|r| r.full_command),
    );

    let total_count: usize = ranked.iter().map(|(_, count)| count).sum();
    let variants = ranked
        .into_iter()
        .take(limit)
        .map(|(full_command, count)| DetailEntry {
            full_command,
            count,
        })
        .collect();

    DetailReport {
        command: command.to_string(),
        total_count,
        variants,
    }
}
