//! Event Store - append-only command history log
//!
//! The EventStore owns the history file. Every shell session appends to
//! the same file independently; the filesystem is the only coordination
//! point between writers.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::Record;
use crate::utils::{atomic_write, current_timestamp, AtomicError};

use super::codec::{decode, encode};
use super::compaction::{Compaction, CompactionOutcome, CompactionPolicy};

/// Default number of records kept after compaction
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Default line count that triggers compaction
pub const DEFAULT_CLEANUP_THRESHOLD: usize = 50_000;

/// Configuration for the EventStore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStoreConfig {
    /// Path to the history file
    pub store_path: PathBuf,
    /// Records retained after compaction
    pub max_entries: usize,
    /// Line count above which compaction rewrites the file
    pub cleanup_threshold: usize,
    /// How often appends check the threshold
    pub compaction_policy: CompactionPolicy,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            max_entries: DEFAULT_MAX_ENTRIES,
            cleanup_threshold: DEFAULT_CLEANUP_THRESHOLD,
            compaction_policy: CompactionPolicy::default(),
        }
    }
}

impl EventStoreConfig {
    /// Create config with a custom store path
    pub fn new<P: AsRef<Path>>(store_path: P) -> Self {
        Self {
            store_path: store_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Set retention bounds
    pub fn with_retention(mut self, max_entries: usize, cleanup_threshold: usize) -> Self {
        self.max_entries = max_entries;
        self.cleanup_threshold = cleanup_threshold;
        self
    }

    /// Set the compaction trigger policy
    pub fn with_policy(mut self, policy: CompactionPolicy) -> Self {
        self.compaction_policy = policy;
        self
    }

    /// Get the history file path
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}

/// `~/.cmdhist/history`, or `.cmdhist/history` when no home directory is known
pub fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cmdhist")
        .join("history")
}

/// Result type for EventStore operations
pub type EventStoreResult<T> = Result<T, EventStoreError>;

/// Errors that can occur in EventStore operations
#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("no command history found at {}", .0.display())]
    MissingStore(PathBuf),
    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<AtomicError> for EventStoreError {
    fn from(e: AtomicError) -> Self {
        match e {
            AtomicError::Write { path, source } | AtomicError::Rename { path, source } => {
                EventStoreError::WriteFailure { path, source }
            }
        }
    }
}

/// The EventStore manages the append-only history file
#[derive(Debug, Clone)]
pub struct EventStore {
    config: EventStoreConfig,
}

impl EventStore {
    /// Create a store over the configured file
    ///
    /// Nothing touches the disk until the first append.
    pub fn new(config: EventStoreConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &EventStoreConfig {
        &self.config
    }

    /// Path to the history file
    pub fn path(&self) -> &Path {
        &self.config.store_path
    }

    /// Whether the history file exists
    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// Append a record to the history file
    ///
    /// The file is opened in append mode and the encoded line goes out in a
    /// single write, so concurrent appends from other shells interleave at
    /// line granularity.
    pub fn append(&self, record: &Record) -> EventStoreResult<()> {
        let path = self.path();
        let write_err = |source: io::Error| EventStoreError::WriteFailure {
            path: path.to_path_buf(),
            source,
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(write_err)?;

        file.write_all(encode(record).as_bytes()).map_err(write_err)?;

        Ok(())
    }

    /// Stream the records in file order
    ///
    /// Each call re-reads from the start of the file. Lines that do not
    /// decode, including a half-written line at the end of the file, are
    /// skipped.
    pub fn scan(&self) -> EventStoreResult<RecordIter> {
        let path = self.path();
        let file = File::open(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => EventStoreError::MissingStore(path.to_path_buf()),
            _ => EventStoreError::ReadFailure {
                path: path.to_path_buf(),
                source,
            },
        })?;

        Ok(RecordIter::new(BufReader::new(file)))
    }

    /// Truncate the history to empty
    ///
    /// Irreversible. The empty file replaces the old one by rename, the same
    /// way compaction does.
    pub fn clear(&self) -> EventStoreResult<()> {
        if !self.exists() {
            return Err(EventStoreError::MissingStore(self.path().to_path_buf()));
        }

        atomic_write(self.path(), "")?;
        debug!(path = %self.path().display(), "cleared command history");

        Ok(())
    }

    /// Compact the store if it is over the cleanup threshold
    pub fn compact(&self) -> EventStoreResult<CompactionOutcome> {
        Compaction::new(&self.config).run()
    }

    /// Record a command line as typed by the user
    ///
    /// Stamps the current time, appends, and then lets the compaction policy
    /// decide whether to check the threshold. Returns `Ok(None)` when the
    /// line has no base command and nothing was written.
    pub fn capture(&self, command_line: &str) -> EventStoreResult<Option<Record>> {
        self.capture_at(command_line, current_timestamp(), &mut rand::rng())
    }

    /// Like [`capture`](Self::capture), with an explicit clock and random source
    pub fn capture_at<R: Rng>(
        &self,
        command_line: &str,
        timestamp: i64,
        rng: &mut R,
    ) -> EventStoreResult<Option<Record>> {
        let Some(record) = Record::new(timestamp, command_line) else {
            debug!("ignoring command line without a base command");
            return Ok(None);
        };

        self.append(&record)?;

        if self.config.compaction_policy.should_check(rng) {
            // The record is already stored; a failed compaction only
            // delays trimming until the next check.
            if let Err(e) = self.compact() {
                warn!("compaction failed: {e}");
            }
        }

        Ok(Some(record))
    }
}

/// Iterator over the records of a history file
///
/// Reads line by line; memory use does not grow with the file.
pub struct RecordIter {
    reader: BufReader<File>,
    buf: Vec<u8>,
    line_num: usize,
}

impl RecordIter {
    fn new(reader: BufReader<File>) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_num: 0,
        }
    }
}

impl Iterator for RecordIter {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    warn!("stopped reading history at line {}: {e}", self.line_num + 1);
                    return None;
                }
            }
            self.line_num += 1;

            let Ok(line) = std::str::from_utf8(&self.buf) else {
                debug!(line = self.line_num, "skipping non-UTF-8 history line");
                continue;
            };

            if line.trim().is_empty() {
                continue;
            }

            match decode(line) {
                Ok(record) => return Some(record),
                Err(e) => {
                    debug!(line = self.line_num, "skipping malformed history line: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_store() -> (EventStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = EventStoreConfig::new(temp_dir.path().join("history"));
        (EventStore::new(config), temp_dir)
    }

    fn record(timestamp: i64, command: &str) -> Record {
        Record::new(timestamp, command).unwrap()
    }

    #[test]
    fn test_append_and_scan() {
        let (store, _temp_dir) = create_test_store();

        store.append(&record(100, "git status")).unwrap();
        store.append(&record(101, "ls -la")).unwrap();

        let records: Vec<Record> = store.scan().unwrap().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].base_command, "git");
        assert_eq!(records[1].full_command, "ls -la");
    }

    #[test]
    fn test_append_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("history");
        let store = EventStore::new(EventStoreConfig::new(&path));

        store.append(&record(1, "pwd")).unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "1|pwd|pwd\n");
    }

    #[test]
    fn test_append_to_unwritable_path() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is expected
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = EventStore::new(EventStoreConfig::new(blocker.join("history")));

        let result = store.append(&record(1, "ls"));
        assert!(matches!(result, Err(EventStoreError::WriteFailure { .. })));
    }

    #[test]
    fn test_scan_missing_store() {
        let (store, _temp_dir) = create_test_store();
        assert!(matches!(store.scan(), Err(EventStoreError::MissingStore(_))));
    }

    #[test]
    fn test_scan_skips_malformed_lines() {
        let (store, _temp_dir) = create_test_store();
        fs::write(store.path(), "100|ls|ls -la\ngarbage without delimiters\n").unwrap();

        let records: Vec<Record> = store.scan().unwrap().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].full_command, "ls -la");
    }

    #[test]
    fn test_scan_tolerates_partial_tail_and_bad_bytes() {
        let (store, _temp_dir) = create_test_store();
        let mut bytes = b"1|ls|ls\n\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'|', b'x', b'|', b'y', b'\n']);
        bytes.extend_from_slice(b"2|git|git log\n3|gi");
        fs::write(store.path(), bytes).unwrap();

        let commands: Vec<String> = store.scan().unwrap().map(|r| r.base_command).collect();
        assert_eq!(commands, vec!["ls", "git"]);
    }

    #[test]
    fn test_scan_is_restartable() {
        let (store, _temp_dir) = create_test_store();
        store.append(&record(1, "ls")).unwrap();

        assert_eq!(store.scan().unwrap().count(), 1);
        store.append(&record(2, "pwd")).unwrap();
        assert_eq!(store.scan().unwrap().count(), 2);
    }

    #[test]
    fn test_clear() {
        let (store, _temp_dir) = create_test_store();
        store.append(&record(1, "ls")).unwrap();

        store.clear().unwrap();

        assert!(store.exists());
        assert_eq!(store.scan().unwrap().count(), 0);
    }

    #[test]
    fn test_clear_missing_store() {
        let (store, _temp_dir) = create_test_store();
        assert!(matches!(store.clear(), Err(EventStoreError::MissingStore(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_clear_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let (store, _temp_dir) = create_test_store();
        store.append(&record(1, "ls")).unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o600)).unwrap();

        store.clear().unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_capture_derives_base_command() {
        let (store, _temp_dir) = create_test_store();
        let mut rng = StdRng::seed_from_u64(7);

        let captured = store
            .capture_at("cat log.txt | grep error", 500, &mut rng)
            .unwrap()
            .unwrap();

        assert_eq!(captured.base_command, "cat");
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "500|cat|cat log.txt | grep error\n"
        );
    }

    #[test]
    fn test_capture_stores_command_verbatim() {
        let (store, _temp_dir) = create_test_store();
        let mut rng = StdRng::seed_from_u64(7);

        store.capture_at("git commit -m x   ", 1, &mut rng).unwrap();
        store.capture_at("git commit -m x", 2, &mut rng).unwrap();

        let commands: Vec<String> = store.scan().unwrap().map(|r| r.full_command).collect();
        assert_eq!(commands, vec!["git commit -m x   ", "git commit -m x"]);
    }

    #[test]
    fn test_capture_ignores_blank_lines() {
        let (store, _temp_dir) = create_test_store();
        let mut rng = StdRng::seed_from_u64(7);

        assert!(store.capture_at("   ", 1, &mut rng).unwrap().is_none());
        assert!(!store.exists());
    }

    #[test]
    fn test_capture_with_strict_policy_compacts() {
        let temp_dir = TempDir::new().unwrap();
        let config = EventStoreConfig::new(temp_dir.path().join("history"))
            .with_retention(3, 5)
            .with_policy(CompactionPolicy::EveryAppend);
        let store = EventStore::new(config);
        let mut rng = StdRng::seed_from_u64(1);

        for i in 0..6 {
            store.capture_at(&format!("cmd{i}"), i, &mut rng).unwrap();
        }

        let commands: Vec<String> = store.scan().unwrap().map(|r| r.base_command).collect();
        assert_eq!(commands, vec!["cmd3", "cmd4", "cmd5"]);
    }

    #[test]
    fn test_missing_store_message() {
        let err = EventStoreError::MissingStore(PathBuf::from("/tmp/none"));
        assert_eq!(err.to_string(), "no command history found at /tmp/none");
    }
}
