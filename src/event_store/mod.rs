//! Event Store Module for the command history log
//!
//! This module provides the storage side of the history:
//! - `codec`: one record per line, `timestamp|base_command|full_command`
//! - `EventStore`: append, streaming scan, clear, capture
//! - `Compaction`: retention-bounded rewrite of the log
//!
//! # Architecture
//!
//! ```text
//! Write Path (every command):
//! ┌─────────┐    ┌──────────────┐    ┌──────────────────┐    ┌──────────────┐
//! │ shell   │───►│ capture()    │───►│ append one line  │───►│ should_check │
//! │ hook    │    │ derive base  │    │ O_APPEND write   │    │ ~1 in 100    │
//! └─────────┘    └──────────────┘    └──────────────────┘    └──────┬───────┘
//!                                                                   ▼
//!                                         ┌──────────────────────────────────┐
//!                                         │ compact(): over threshold?       │
//!                                         │ keep tail -> temp file -> rename │
//!                                         └──────────────────────────────────┘
//!
//! Read Path (reports):
//! ┌────────┐    ┌──────────────────┐    ┌──────────────┐
//! │ scan() │───►│ skip bad lines   │───►│ query engine │───► report
//! └────────┘    └──────────────────┘    └──────────────┘
//! ```

pub mod codec;
mod compaction;
mod store;

pub use codec::{decode, encode, MalformedRecord, DELIMITER};
pub use compaction::{Compaction, CompactionOutcome, CompactionPolicy, DEFAULT_CHECK_ONE_IN};
pub use store::{
    default_store_path, EventStore, EventStoreConfig, EventStoreError, EventStoreResult,
    RecordIter, DEFAULT_CLEANUP_THRESHOLD, DEFAULT_MAX_ENTRIES,
};
