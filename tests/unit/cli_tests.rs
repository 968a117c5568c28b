//! Unit tests for CLI argument parsing and validation

use clap::Parser;
use crossdiff::cli::{Cli, Commands, OutputFormat};
use std::path::PathBuf;

#[test]
fn test_cli_diff_command() {
    let cli = Cli::try_parse_from(["crossdiff", "diff", "a.csv", "b.csv", "--key", "id"]).unwrap();
    match cli.command {
        Commands::Diff {
            source,
            target,
            keys,
            format,
            output,
            sample_cap,
            check,
        } => {
            assert_eq!(source, PathBuf::from("a.csv"));
            assert_eq!(target, PathBuf::from("b.csv"));
            assert_eq!(keys, vec!["id".to_string()]);
            assert_eq!(format, "pretty");
            assert!(output.is_none());
            assert_eq!(sample_cap, 10);
            assert!(!check);
        }
        _ => panic!("Expected Diff command"),
    }
}

#[test]
fn test_cli_diff_comma_separated_keys() {
    let cli = Cli::try_parse_from([
        "crossdiff", "diff", "a.csv", "b.csv", "--key", "region,id",
    ])
    .unwrap();
    match cli.command {
        Commands::Diff { keys, .. } => {
            assert_eq!(keys, vec!["region".to_string(), "id".to_string()]);
        }
        _ => panic!("Expected Diff command"),
    }
}

#[test]
fn test_cli_diff_repeated_key_flag() {
    let cli = Cli::try_parse_from([
        "crossdiff", "diff", "a.csv", "b.csv", "-k", "region", "-k", "id",
    ])
    .unwrap();
    match cli.command {
        Commands::Diff { keys, .. } => {
            assert_eq!(keys, vec!["region".to_string(), "id".to_string()]);
        }
        _ => panic!("Expected Diff command"),
    }
}

#[test]
fn test_cli_diff_requires_key() {
    assert!(Cli::try_parse_from(["crossdiff", "diff", "a.csv", "b.csv"]).is_err());
}

#[test]
fn test_cli_diff_with_options() {
    let cli = Cli::try_parse_from([
        "crossdiff",
        "diff",
        "a.csv",
        "b.csv",
        "--key",
        "id",
        "--format",
        "json",
        "--output",
        "report.json",
        "--sample-cap",
        "25",
        "--check",
    ])
    .unwrap();
    match cli.command {
        Commands::Diff {
            format,
            output,
            sample_cap,
            check,
            ..
        } => {
            assert_eq!(format, "json");
            assert_eq!(output, Some(PathBuf::from("report.json")));
            assert_eq!(sample_cap, 25);
            assert!(check);
        }
        _ => panic!("Expected Diff command"),
    }
}

#[test]
fn test_cli_rejects_zero_sample_cap() {
    let result = Cli::try_parse_from([
        "crossdiff",
        "diff",
        "a.csv",
        "b.csv",
        "--key",
        "id",
        "--sample-cap",
        "0",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_cli_inspect_command() {
    let cli = Cli::try_parse_from(["crossdiff", "inspect", "data.parquet"]).unwrap();
    match cli.command {
        Commands::Inspect { input, format } => {
            assert_eq!(input, PathBuf::from("data.parquet"));
            assert_eq!(format, "pretty");
        }
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn test_cli_verbose_flag_is_global() {
    let cli =
        Cli::try_parse_from(["crossdiff", "inspect", "data.csv", "--verbose"]).unwrap();
    assert!(cli.verbose);
}

#[test]
fn test_output_format_values() {
    assert_eq!(OutputFormat::parse("pretty").unwrap(), OutputFormat::Pretty);
    assert_eq!(OutputFormat::parse("json").unwrap(), OutputFormat::Json);
    assert!(OutputFormat::parse("html").is_err());
}
