//! Atomic file operations
//!
//! Rewrites of the history file go through a temporary sibling file:
//!
//! 1. Write to `<name>.tmp.<pid>` in the same directory
//! 2. Call sync_all() to flush to disk
//! 3. Rename temp file to final path (atomic on most filesystems)
//!
//! A crash leaves either the old file or the new file, never a partial one.
//! When the target already exists its permissions carry over to the
//! replacement.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for atomic operations
pub type AtomicResult<T> = Result<T, AtomicError>;

/// Errors that can occur during atomic operations
#[derive(Debug, Error)]
pub enum AtomicError {
    #[error("failed to write temp file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to rename {} into place: {source}", path.display())]
    Rename {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Temporary sibling path for `path`, unique per process
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "history".into());
    name.push(format!(".tmp.{}", std::process::id()));
    path.with_file_name(name)
}

/// Atomically write content to a file
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> AtomicResult<()> {
    atomic_write_with(path, |writer| writer.write_all(content.as_bytes()))
}

/// Atomically write content using a writer function
///
/// The writer is buffered, so callers can stream many small writes
/// without building the whole content in memory first.
///
/// # Example
///
/// ```ignore
/// atomic_write_with("history", |w| {
///     writeln!(w, "1700000000|ls|ls -la")?;
///     Ok(())
/// })?;
/// ```
pub fn atomic_write_with<P, F>(path: P, write_fn: F) -> AtomicResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    let write_err = |source: io::Error| AtomicError::Write {
        path: temp_path.clone(),
        source,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    // Keep the mode of the file being replaced, not the umask default
    let permissions = fs::metadata(path).ok().map(|m| m.permissions());

    let result = File::create(&temp_path).and_then(|file| {
        if let Some(permissions) = permissions {
            file.set_permissions(permissions)?;
        }
        let mut writer = BufWriter::new(file);
        write_fn(&mut writer)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    });

    if let Err(source) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(source));
    }

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(AtomicError::Rename {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}
