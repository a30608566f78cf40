//! Tests for analyze, completions, and global flags.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_analyze() {
    match parse(&["scnseg", "analyze", "changes.jsonl"]) {
        CliCommand::Analyze { source, setup } => {
            assert_eq!(source, Path::new("changes.jsonl"));
            assert_eq!(setup, "");
        }
        _ => panic!("expected Analyze"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["scnseg", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_global_config_after_subcommand() {
    let cli = Cli::try_parse_from(["scnseg", "analyze", "changes.jsonl", "--config", "/tmp/c.toml"])
        .unwrap();
    assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/c.toml")));
}

#[test]
fn cli_parse_config_defaults_to_none() {
    let cli = Cli::try_parse_from(["scnseg", "plan", "changes.jsonl"]).unwrap();
    assert!(cli.config.is_none());
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["scnseg"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
