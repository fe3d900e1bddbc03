//! Command record - the single entity stored in the history log

use serde::{Deserialize, Serialize};

/// Characters that end the base command token
const BASE_TERMINATORS: &[char] = &['|', '<', '>'];

/// One captured command invocation
///
/// Records are immutable once appended to the store. The base command is
/// derived from the full command line at capture time and stored alongside
/// it so queries never need to re-tokenize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Seconds since the Unix epoch, stamped at capture
    pub timestamp: i64,
    /// First token of the command line, used as the aggregation key
    pub base_command: String,
    /// The command line as typed
    pub full_command: String,
}

impl Record {
    /// Build a record from a raw command line
    ///
    /// The command line is kept verbatim, surrounding whitespace included,
    /// except that embedded line breaks are flattened to spaces so a record
    /// always occupies exactly one line in the store. Returns `None` when
    /// the line has no usable base command (blank input, or input starting
    /// with a pipe or redirect).
    pub fn new(timestamp: i64, command_line: &str) -> Option<Self> {
        let full_command: String = command_line
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();

        let base_command = derive_base_command(&full_command)?;

        Some(Self {
            timestamp,
            base_command,
            full_command,
        })
    }
}

/// Derive the base command of a command line
///
/// Takes the first whitespace-delimited token and cuts it at the first
/// pipe or redirect, so `ls|wc` yields `ls` and `echo>out` yields `echo`.
pub fn derive_base_command(command_line: &str) -> Option<String> {
    let token = command_line.split_whitespace().next()?;
    let base = token
        .split(BASE_TERMINATORS)
        .next()
        .unwrap_or_default();

    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}
