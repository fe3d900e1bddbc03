//! Query result types

use serde::{Deserialize, Serialize};

/// A base command and how often it was run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyEntry {
    pub command: String,
    pub count: usize,
}

/// Number of runs that fell into one time bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBucket {
    /// Formatted bucket label (e.g. `2024-03-09` for day buckets)
    pub label: String,
    pub count: usize,
}

/// One distinct full command line under a base command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailEntry {
    pub full_command: String,
    pub count: usize,
}

/// Per-variant breakdown of a base command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailReport {
    pub command: String,
    /// Total runs of the base command, across all variants
    pub total_count: usize,
    /// Most frequent variants first, truncated to the requested limit
    pub variants: Vec<DetailEntry>,
}

/// Summary statistics over the whole history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_records: usize,
    pub unique_base_commands: usize,
    /// Span between the first and last record in file order, in days
    pub days_tracked: f64,
    pub average_per_day: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_timestamp: Option<i64>,
}
