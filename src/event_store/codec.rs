//! Line codec for the history file
//!
//! Each record is one line: `timestamp|base_command|full_command`.
//! The full command is written verbatim, so it may itself contain `|`.
//! Decoding treats only the first two delimiters as field boundaries.

use thiserror::Error;

use crate::types::Record;

/// Field delimiter
pub const DELIMITER: char = '|';

/// A line that does not hold a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("expected at least two '|' delimiters")]
    MissingDelimiter,
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
    #[error("empty base command")]
    EmptyBaseCommand,
}

/// Encode a record as one line, including the trailing newline
pub fn encode(record: &Record) -> String {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}\n",
        record.timestamp, record.base_command, record.full_command
    )
}

/// Decode one line of the history file
///
/// A trailing line terminator is ignored. Everything after the second
/// delimiter belongs to the full command.
pub fn decode(line: &str) -> Result<Record, MalformedRecord> {
    let line = line.trim_end_matches(['\n', '\r']);

    let mut fields = line.splitn(3, DELIMITER);
    let (Some(timestamp), Some(base_command), Some(full_command)) =
        (fields.next(), fields.next(), fields.next())
    else {
        return Err(MalformedRecord::MissingDelimiter);
    };

    let timestamp = timestamp
        .trim()
        .parse::<i64>()
        .map_err(|_| MalformedRecord::InvalidTimestamp(timestamp.to_string()))?;

    if base_command.is_empty() {
        return Err(MalformedRecord::EmptyBaseCommand);
    }

    Ok(Record {
        timestamp,
        base_command: base_command.to_string(),
        full_command: full_command.to_string(),
    })
}
