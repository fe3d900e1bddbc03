//! Retention-bounded compaction of the history file
//!
//! Provides functionality for:
//! - Counting the lines of the history file
//! - Rewriting the file to keep only the newest `max_entries` records
//! - Deciding when an append should check the threshold
//!
//! The rewrite goes through a temporary file and a rename, so readers and
//! writers never see a half-written history. An append that lands between
//! the tail being read and the rename is lost; no lock is held across the
//! rewrite.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::utils::atomic_write_with;

use super::codec::decode;
use super::store::{EventStoreConfig, EventStoreError, EventStoreResult};

/// Default sampling rate for the soft-bound policy
pub const DEFAULT_CHECK_ONE_IN: u32 = 100;

/// When appends check the cleanup threshold
///
/// The probabilistic policy avoids counting lines on every command, so the
/// file may run past the threshold by roughly `one_in` appends before a
/// check fires. `EveryAppend` checks each time and keeps the bound strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactionPolicy {
    /// Check on about one append in `one_in`
    Probabilistic { one_in: u32 },
    /// Check on every append
    EveryAppend,
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        CompactionPolicy::Probabilistic {
            one_in: DEFAULT_CHECK_ONE_IN,
        }
    }
}

impl CompactionPolicy {
    /// Whether this append should check the threshold
    pub fn should_check<R: Rng>(&self, rng: &mut R) -> bool {
        match *self {
            CompactionPolicy::EveryAppend => true,
            CompactionPolicy::Probabilistic { one_in } if one_in <= 1 => true,
            CompactionPolicy::Probabilistic { one_in } => rng.random_ratio(1, one_in),
        }
    }
}

/// What a compaction run did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CompactionOutcome {
    /// The file was at or under the threshold and left alone
    #[serde(rename_all = "camelCase")]
    Skipped { line_count: usize },
    /// The file was rewritten with only its newest records
    #[serde(rename_all = "camelCase")]
    Compacted { line_count: usize, retained: usize },
}

/// Compaction runner for one history file
pub struct Compaction<'a> {
    config: &'a EventStoreConfig,
}

impl<'a> Compaction<'a> {
    /// Create a runner over the given configuration
    pub fn new(config: &'a EventStoreConfig) -> Self {
        Self { config }
    }

    /// Compact if the line count exceeds the cleanup threshold
    pub fn run(&self) -> EventStoreResult<CompactionOutcome> {
        let line_count = self.line_count()?;

        if line_count <= self.config.cleanup_threshold {
            debug!(
                line_count,
                threshold = self.config.cleanup_threshold,
                "history under cleanup threshold"
            );
            return Ok(CompactionOutcome::Skipped { line_count });
        }

        self.rewrite_tail(line_count)
    }

    /// Keep only the newest `max_entries` records, regardless of threshold
    pub fn force(&self) -> EventStoreResult<CompactionOutcome> {
        let line_count = self.line_count()?;
        self.rewrite_tail(line_count)
    }

    /// Count non-empty lines in the history file
    pub fn line_count(&self) -> EventStoreResult<usize> {
        let path = self.config.store_path();
        let reader = open(path)?;

        let mut count = 0;
        for line in reader.split(b'\n') {
            let line = line.map_err(|source| read_failure(path, source))?;
            if !line.iter().all(u8::is_ascii_whitespace) {
                count += 1;
            }
        }

        Ok(count)
    }

    fn rewrite_tail(&self, line_count: usize) -> EventStoreResult<CompactionOutcome> {
        let path = self.config.store_path();
        let max_entries = self.config.max_entries;

        // Ring buffer of the newest decodable lines
        let mut tail: VecDeque<String> = VecDeque::with_capacity(max_entries.min(line_count));
        for line in open(path)?.split(b'\n') {
            let line = line.map_err(|source| read_failure(path, source))?;
            let Ok(line) = String::from_utf8(line) else {
                continue;
            };
            if decode(&line).is_err() {
                continue;
            }
            if max_entries == 0 {
                continue;
            }
            if tail.len() == max_entries {
                tail.pop_front();
            }
            tail.push_back(line);
        }

        let retained = tail.len();
        atomic_write_with(path, |writer| {
            for line in &tail {
                writer.write_all(line.trim_end_matches('\r').as_bytes())?;
                writer.write_all(b"\n")?;
            }
            Ok(())
        })?;

        info!(
            path = %path.display(),
            line_count,
            retained,
            "compacted command history"
        );

        Ok(CompactionOutcome::Compacted {
            line_count,
            retained,
        })
    }
}

fn open(path: &Path) -> EventStoreResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => EventStoreError::MissingStore(path.to_path_buf()),
            _ => read_failure(path, source),
        })
}

fn read_failure(path: &Path, source: io::Error) -> EventStoreError {
    EventStoreError::ReadFailure {
        path: path.to_path_buf(),
        source,
    }
}
