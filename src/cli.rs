//! Command-line surface of `cmdhist`
//!
//! Each subcommand maps onto one store, query, or export call. Errors are
//! caught here and turned into a message plus exit status; nothing below
//! this layer decides how the process exits.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::warn;

use crate::event_store::{Compaction, EventStore, EventStoreError};
use crate::export::export;
use crate::query::{self, Granularity, Period};
use crate::report::{self, OutputFormat};

/// Exit status for success
pub const EXIT_OK: i32 = 0;

/// Exit status for a missing store, usage error, or failed operation
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, Parser)]
#[command(
    name = "cmdhist",
    version,
    about = "Record shell commands and report on how you use them"
)]
pub struct Cli {
    /// Output format for reports
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record one command line (called from the shell hook)
    Record {
        /// The command line as typed
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Most frequently used commands
    Top {
        /// Lookback window: hour, day, week, month, year or all
        #[arg(short, long, default_value_t = Period::All)]
        period: Period,
        /// Number of commands to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Usage of one command over time
    Timeline {
        /// Base command to chart
        command: String,
        /// Bucket size: hour, day, week or month
        #[arg(short, long, default_value = "day")]
        period: String,
    },
    /// Distinct invocations of one command
    Detail {
        /// Base command to break down
        command: String,
        /// Number of variants to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Summary statistics
    Stats,
    /// Export the full history as CSV
    Export {
        /// Destination file
        output: PathBuf,
    },
    /// Delete the entire history
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
    /// Trim the history down to the retained tail
    Compact {
        /// Compact even when under the cleanup threshold
        #[arg(long)]
        force: bool,
    },
}

/// Failure of a CLI command
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] EventStoreError),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("refusing to clear history without --yes")]
    ConfirmationRequired,
}

/// Run one command against the store, writing the report to `out`
///
/// `now` anchors the lookback window of `top`.
pub fn execute<W: Write>(
    command: &Command,
    format: OutputFormat,
    store: &EventStore,
    now: i64,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        Command::Record { command } => {
            // A failed capture must never fail the user's shell command
            let line = command.join(" ");
            if let Err(e) = store.capture(&line) {
                warn!("failed to record command: {e}");
            }
            Ok(())
        }

        Command::Top { period, limit } => {
            let entries = query::frequency(store.scan()?, period.since(now), *limit);
            let rendered = match format {
                OutputFormat::Text => report::frequency_text(&entries, *period),
                OutputFormat::Json => report::to_json(&entries)?,
            };
            emit(out, &rendered)
        }

        Command::Timeline { command, period } => {
            let granularity = Granularity::from(period.as_str());
            let buckets = query::timeline(store.scan()?, command, granularity);
            let rendered = match format {
                OutputFormat::Text => report::timeline_text(command, granularity, &buckets),
                OutputFormat::Json => report::to_json(&buckets)?,
            };
            emit(out, &rendered)
        }

        Command::Detail { command, limit } => {
            let detail = query::detail(store.scan()?, command, *limit);
            let rendered = match format {
                OutputFormat::Text => report::detail_text(&detail),
                OutputFormat::Json => report::to_json(&detail)?,
            };
            emit(out, &rendered)
        }

        Command::Stats => {
            let stats = query::stats(store.scan()?);
            let rendered = match format {
                OutputFormat::Text => report::stats_text(&stats),
                OutputFormat::Json => report::to_json(&stats)?,
            };
            emit(out, &rendered)
        }

        Command::Export { output } => {
            let rows = export(store, output)?;
            emit(out, &format!("Exported {rows} commands to {}\n", output.display()))
        }

        Command::Clear { yes } => {
            if !store.exists() {
                return Err(EventStoreError::MissingStore(store.path().to_path_buf()).into());
            }
            if !yes {
                return Err(CliError::ConfirmationRequired);
            }
            store.clear()?;
            emit(out, "Command history cleared.\n")
        }

        Command::Compact { force } => {
            let compaction = Compaction::new(store.config());
            let outcome = if *force {
                compaction.force()?
            } else {
                compaction.run()?
            };
            let rendered = match format {
                OutputFormat::Text => report::compaction_text(&outcome, store.config()),
                OutputFormat::Json => report::to_json(&outcome)?,
            };
            emit(out, &rendered)
        }
    }
}

fn emit<W: Write>(out: &mut W, rendered: &str) -> Result<(), CliError> {
    out.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
