//! Environment configuration
//!
//! The store configuration is read once at startup and passed to
//! [`EventStore::new`](crate::event_store::EventStore::new).

use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::event_store::{
    default_store_path, CompactionPolicy, EventStoreConfig, DEFAULT_CLEANUP_THRESHOLD,
    DEFAULT_MAX_ENTRIES,
};

/// Path of the history file
pub const ENV_HISTORY_FILE: &str = "CMDHIST_FILE";

/// Records kept after compaction
pub const ENV_MAX_ENTRIES: &str = "CMDHIST_MAX_ENTRIES";

/// Line count that triggers compaction
pub const ENV_CLEANUP_THRESHOLD: &str = "CMDHIST_CLEANUP_THRESHOLD";

/// Check the threshold on every append instead of sampling
pub const ENV_STRICT_COMPACTION: &str = "CMDHIST_STRICT_COMPACTION";

/// Log filter for the binary
pub const ENV_LOG: &str = "CMDHIST_LOG";

/// Build the store configuration from the process environment
pub fn from_env() -> EventStoreConfig {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    from_lookup(|key| env::var(key).ok(), &cwd)
}

/// Build the store configuration from an arbitrary variable lookup
///
/// Relative store paths are resolved against `cwd`. Numbers that fail to
/// parse fall back to their defaults.
pub fn from_lookup<F>(lookup: F, cwd: &Path) -> EventStoreConfig
where
    F: Fn(&str) -> Option<String>,
{
    let store_path = match lookup(ENV_HISTORY_FILE).filter(|p| !p.trim().is_empty()) {
        Some(path) => {
            let path = PathBuf::from(path);
            if path.is_absolute() {
                path
            } else {
                cwd.join(path)
            }
        }
        None => default_store_path(),
    };

    let max_entries = parse_count(&lookup, ENV_MAX_ENTRIES, DEFAULT_MAX_ENTRIES);
    let cleanup_threshold = parse_count(&lookup, ENV_CLEANUP_THRESHOLD, DEFAULT_CLEANUP_THRESHOLD);

    let strict = lookup(ENV_STRICT_COMPACTION)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    let compaction_policy = if strict {
        CompactionPolicy::EveryAppend
    } else {
        CompactionPolicy::default()
    };

    EventStoreConfig {
        store_path,
        max_entries,
        cleanup_threshold,
        compaction_policy,
    }
}

fn parse_count<F>(lookup: &F, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring {key}={raw:?}: not a non-negative integer, using {default}");
            default
        }),
    }
}
