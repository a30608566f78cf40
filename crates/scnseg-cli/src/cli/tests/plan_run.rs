//! Tests for plan and run subcommands.

use super::parse;
use crate::cli::CliCommand;
use std::path::Path;

#[test]
fn cli_parse_plan_defaults() {
    match parse(&["scnseg", "plan", "changes.jsonl"]) {
        CliCommand::Plan { range } => {
            assert_eq!(range.source, Path::new("changes.jsonl"));
            assert!(range.start.is_none());
            assert!(range.end.is_none());
            assert_eq!(range.setup, "");
        }
        _ => panic!("expected Plan"),
    }
}

#[test]
fn cli_parse_plan_bounds() {
    match parse(&[
        "scnseg",
        "plan",
        "changes.jsonl",
        "--start",
        "100",
        "--end",
        "10000",
        "--setup",
        "BEGIN start_logmnr; END;",
    ]) {
        CliCommand::Plan { range } => {
            assert_eq!(range.start, Some(100));
            assert_eq!(range.end, Some(10000));
            assert_eq!(range.setup, "BEGIN start_logmnr; END;");
        }
        _ => panic!("expected Plan with bounds"),
    }
}

#[test]
fn cli_parse_run_defaults() {
    match parse(&["scnseg", "run", "changes.jsonl"]) {
        CliCommand::Run {
            range,
            workers,
            report,
        } => {
            assert_eq!(range.source, Path::new("changes.jsonl"));
            assert!(workers.is_none());
            assert!(report.is_none());
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_workers_and_report() {
    match parse(&[
        "scnseg",
        "run",
        "changes.jsonl",
        "--workers",
        "4",
        "--report",
        "/tmp/report.json",
        "--end",
        "5000",
    ]) {
        CliCommand::Run {
            range,
            workers,
            report,
        } => {
            assert_eq!(workers, Some(4));
            assert_eq!(report.as_deref(), Some(Path::new("/tmp/report.json")));
            assert!(range.start.is_none());
            assert_eq!(range.end, Some(5000));
        }
        _ => panic!("expected Run with --workers and --report"),
    }
}

#[test]
fn cli_parse_run_rejects_non_numeric_scn() {
    use crate::cli::Cli;
    use clap::Parser;
    assert!(Cli::try_parse_from(["scnseg", "run", "changes.jsonl", "--start", "abc"]).is_err());
}
