//! Command-line interface for crossdiff

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crossdiff")]
#[command(about = "A key-based dataset comparison tool")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two datasets joined on key columns
    Diff {
        /// Source dataset path (CSV, TSV, JSON, NDJSON, or Parquet)
        source: PathBuf,

        /// Target dataset path
        target: PathBuf,

        /// Key column names (repeat the flag or separate with commas)
        #[arg(short = 'k', long = "key", required = true, value_delimiter = ',')]
        keys: Vec<String>,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,

        /// Write the JSON report to a file as well
        #[arg(long)]
        output: Option<PathBuf>,

        /// Mismatch samples retained per column (must be > 0)
        #[arg(long, default_value = "10", value_parser = validate_sample_cap)]
        sample_cap: usize,

        /// Exit with status 2 when the datasets differ
        #[arg(long)]
        check: bool,
    },

    /// Show schema and row count for one dataset
    Inspect {
        /// Dataset path
        input: PathBuf,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

/// Parse output format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "Invalid output format: {}. Use 'pretty' or 'json'",
                s
            )),
        }
    }
}

/// Validate that the sample cap is greater than 0
fn validate_sample_cap(s: &str) -> Result<usize, String> {
    let cap: usize = s
        .parse()
        .map_err(|_| format!("Invalid sample cap: '{}'. Must be a positive integer.", s))?;

    if cap == 0 {
        return Err("Sample cap must be greater than 0".to_string());
    }

    Ok(cap)
}
