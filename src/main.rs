//! cmdhist - Binary Entry Point
//!
//! Parses arguments, loads the store configuration from the environment,
//! and maps the outcome of the command onto the process exit status.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use command_history::cli::{execute, Cli, EXIT_FAILURE, EXIT_OK};
use command_history::config::{self, ENV_LOG};
use command_history::event_store::EventStore;
use command_history::utils::current_timestamp;

fn main() -> ExitCode {
    // Logs go to stderr so reports on stdout stay clean
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            return if e.use_stderr() {
                exit(EXIT_FAILURE)
            } else {
                exit(EXIT_OK)
            };
        }
    };

    let store = EventStore::new(config::from_env());
    let mut stdout = io::stdout().lock();

    let now = current_timestamp();
    match execute(&cli.command, cli.format, &store, now, &mut stdout) {
        Ok(()) => exit(EXIT_OK),
        Err(e) => {
            eprintln!("cmdhist: {e}");
            exit(EXIT_FAILURE)
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(code as u8)
}
