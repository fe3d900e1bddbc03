//! Command History
//!
//! Records every shell command with a timestamp and answers frequency,
//! timeline, and statistics queries over the history.
//!
//! # Modules
//!
//! - `types`: The stored record and query result shapes
//! - `event_store`: Line codec, append-only log, and compaction
//! - `query`: Frequency, timeline, detail, and summary reports
//! - `export`: CSV export
//! - `config`: Store configuration from the environment
//! - `report`: Text and JSON rendering
//! - `cli`: The `cmdhist` command surface
//! - `utils`: Atomic writes and timestamps
//!
//! # Example
//!
//! ```no_run
//! use command_history::event_store::{EventStore, EventStoreConfig};
//! use command_history::query;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = EventStore::new(EventStoreConfig::new("/tmp/history"));
//!     store.capture("git status")?;
//!
//!     for entry in query::frequency(store.scan()?, 0, 10) {
//!         println!("{} {}", entry.command, entry.count);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod event_store;
pub mod export;
pub mod query;
pub mod report;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use event_store::{EventStore, EventStoreConfig, EventStoreError, EventStoreResult};
pub use types::{DetailReport, FrequencyEntry, HistoryStats, Record, TimelineBucket};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
