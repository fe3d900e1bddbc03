//! Rendering of query results for the terminal
//!
//! Text output is meant for people; `--format json` emits the same data
//! through serde for scripts.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use crate::event_store::{CompactionOutcome, EventStoreConfig};
use crate::query::{Granularity, Period};
use crate::types::{DetailReport, FrequencyEntry, HistoryStats, TimelineBucket};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Pretty JSON of any report
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Top commands table
pub fn frequency_text(entries: &[FrequencyEntry], period: Period) -> String {
    let scope = match period {
        Period::All => "all time".to_string(),
        other => format!("last {other}"),
    };

    if entries.is_empty() {
        return format!("No commands recorded ({scope}).\n");
    }

    let width = entries.iter().map(|e| e.command.len()).max().unwrap_or(0);
    let mut out = format!("Top {} commands ({scope}):\n", entries.len());
    for (rank, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}. {:<width$}  {}",
            rank + 1,
            entry.command,
            entry.count
        );
    }
    out
}

/// Timeline table with a proportional bar per bucket
pub fn timeline_text(
    command: &str,
    granularity: Granularity,
    buckets: &[TimelineBucket],
) -> String {
    if buckets.is_empty() {
        return format!("No runs of '{command}' recorded.\n");
    }

    const BAR_WIDTH: usize = 40;
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(1).max(1);
    let label_width = buckets.iter().map(|b| b.label.len()).max().unwrap_or(0);

    let mut out = format!("Timeline for '{command}' by {granularity}:\n");
    for bucket in buckets {
        let bar = "#".repeat((bucket.count * BAR_WIDTH).div_ceil(max));
        let _ = writeln!(
            out,
            "  {:<label_width$}  {:>6}  {bar}",
            bucket.label, bucket.count
        );
    }
    out
}

/// Variant breakdown of one base command
pub fn detail_text(report: &DetailReport) -> String {
    if report.total_count == 0 {
        return format!("No runs of '{}' recorded.\n", report.command);
    }

    let mut out = format!(
        "'{}' was run {} times ({} shown variants):\n",
        report.command,
        report.total_count,
        report.variants.len()
    );
    for variant in &report.variants {
        let _ = writeln!(out, "  {:>6}  {}", variant.count, variant.full_command);
    }
    out
}

/// Summary statistics block
pub fn stats_text(stats: &HistoryStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total commands:   {}", stats.total_records);
    let _ = writeln!(out, "Unique commands:  {}", stats.unique_base_commands);
    let _ = writeln!(out, "Days tracked:     {:.1}", stats.days_tracked);
    let _ = writeln!(out, "Average per day:  {:.1}", stats.average_per_day);
    out
}

/// Result line of a compaction run
pub fn compaction_text(outcome: &CompactionOutcome, config: &EventStoreConfig) -> String {
    match *outcome {
        CompactionOutcome::Skipped { line_count } => format!(
            "No compaction needed ({line_count} lines, threshold {}).\n",
            config.cleanup_threshold
        ),
        CompactionOutcome::Compacted {
            line_count,
            retained,
        } => format!("Compacted history: kept {retained} of {line_count} lines.\n"),
    }
}
