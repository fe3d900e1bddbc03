//! Data types for the command history
//!
//! This module contains the stored record and the shapes of query results.

mod record;
mod report;

pub use record::{derive_base_command, Record};
pub use report::{DetailEntry, DetailReport, FrequencyEntry, HistoryStats, TimelineBucket};
