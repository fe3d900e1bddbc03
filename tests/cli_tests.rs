//! CLI integration tests
//!
//! Drive `cli::execute` against real store files and check the rendered
//! reports and error outcomes.

use std::fs;

use clap::Parser;
use tempfile::TempDir;

use command_history::cli::{execute, Cli, CliError};
use command_history::event_store::{EventStore, EventStoreConfig, EventStoreError};
use command_history::types::Record;

const NOW: i64 = 1_700_000_000;

fn create_test_store() -> (EventStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = EventStoreConfig::new(temp_dir.path().join("history"))
        .with_retention(3, 5);
    (EventStore::new(config), temp_dir)
}

fn seed(store: &EventStore, commands: &[&str]) {
    for (i, cmd) in commands.iter().enumerate() {
        store
            .append(&Record::new(NOW - 10 + i as i64, cmd).unwrap())
            .unwrap();
    }
}

fn run(store: &EventStore, args: &[&str]) -> Result<String, CliError> {
    let argv = std::iter::once("cmdhist").chain(args.iter().copied());
    let cli = Cli::try_parse_from(argv).expect("valid arguments");
    let mut out = Vec::new();
    execute(&cli.command, cli.format, store, NOW, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_record_then_top() {
    let (store, _temp_dir) = create_test_store();

    run(&store, &["record", "git", "status"]).unwrap();
    run(&store, &["record", "git", "log", "--oneline"]).unwrap();
    run(&store, &["record", "ls"]).unwrap();

    let out = run(&store, &["top", "--period", "day", "-n", "1"]).unwrap();
    assert_eq!(out, "Top 1 commands (last day):\n   1. git  2\n");
}

#[test]
fn test_record_never_fails() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let store = EventStore::new(EventStoreConfig::new(blocker.join("history")));

    assert!(run(&store, &["record", "ls"]).is_ok());
    assert!(!store.exists());
}

#[test]
fn test_reads_report_missing_store() {
    let (store, _temp_dir) = create_test_store();

    for args in [
        vec!["top"],
        vec!["timeline", "ls"],
        vec!["detail", "ls"],
        vec!["stats"],
        vec!["clear", "--yes"],
        vec!["compact"],
    ] {
        let result = run(&store, &args);
        assert!(
            matches!(result, Err(CliError::Store(EventStoreError::MissingStore(_)))),
            "{args:?} -> {result:?}"
        );
    }
}

#[test]
fn test_export_missing_store() {
    let (store, temp_dir) = create_test_store();
    let output = temp_dir.path().join("out.csv");

    let result = run(&store, &["export", output.to_str().unwrap()]);

    assert!(matches!(
        result,
        Err(CliError::Store(EventStoreError::MissingStore(_)))
    ));
}

#[test]
fn test_timeline_unknown_period_falls_back_to_day() {
    let (store, _temp_dir) = create_test_store();
    seed(&store, &["ls", "ls"]);

    let out = run(
        &store,
        &["timeline", "ls", "--period", "fortnight", "--format", "json"],
    )
    .unwrap();
    let buckets: serde_json::Value = serde_json::from_str(&out).unwrap();

    let label = buckets[0]["label"].as_str().unwrap();
    assert_eq!(label.len(), "2023-11-14".len());
    assert_eq!(buckets[0]["count"], 2);
}

#[test]
fn test_detail_json() {
    let (store, _temp_dir) = create_test_store();
    seed(&store, &["git status", "git push", "git status"]);

    let out = run(&store, &["detail", "git", "--format", "json"]).unwrap();
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(report["totalCount"], 3);
    assert_eq!(report["variants"][0]["fullCommand"], "git status");
    assert_eq!(report["variants"][0]["count"], 2);
}

#[test]
fn test_stats_text() {
    let (store, _temp_dir) = create_test_store();
    seed(&store, &["ls", "pwd"]);

    let out = run(&store, &["stats"]).unwrap();

    assert!(out.contains("Total commands:   2"));
    assert!(out.contains("Unique commands:  2"));
}

#[test]
fn test_clear_requires_confirmation() {
    let (store, _temp_dir) = create_test_store();
    seed(&store, &["ls"]);

    let result = run(&store, &["clear"]);
    assert!(matches!(result, Err(CliError::ConfirmationRequired)));
    assert_eq!(store.scan().unwrap().count(), 1);

    run(&store, &["clear", "--yes"]).unwrap();
    assert_eq!(store.scan().unwrap().count(), 0);
}

#[test]
fn test_compact_and_force() {
    let (store, _temp_dir) = create_test_store();
    seed(&store, &["a", "b", "c", "d"]);

    let out = run(&store, &["compact"]).unwrap();
    assert_eq!(out, "No compaction needed (4 lines, threshold 5).\n");

    let out = run(&store, &["compact", "--force"]).unwrap();
    assert_eq!(out, "Compacted history: kept 3 of 4 lines.\n");

    let kept: Vec<String> = store.scan().unwrap().map(|r| r.base_command).collect();
    assert_eq!(kept, vec!["b", "c", "d"]);
}

#[test]
fn test_export_writes_file() {
    let (store, temp_dir) = create_test_store();
    seed(&store, &["echo a,b"]);
    let output = temp_dir.path().join("history.csv");

    let out = run(&store, &["export", output.to_str().unwrap()]).unwrap();

    assert!(out.starts_with("Exported 1 commands to "));
    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.ends_with("echo,echo a\\,b\n"));
}

#[test]
fn test_usage_errors() {
    assert!(Cli::try_parse_from(["cmdhist", "detail"]).is_err());
    assert!(Cli::try_parse_from(["cmdhist", "record"]).is_err());
    assert!(Cli::try_parse_from(["cmdhist", "top", "--limit", "many"]).is_err());
}
