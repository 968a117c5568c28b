//! Command implementations for the crossdiff CLI

use crate::cli::{Commands, OutputFormat};
use crate::diff::{diff_datasets, DiffOptions};
use crate::error::{CrossdiffError, Result};
use crate::loader::DatasetLoader;
use crate::output::{DatasetSummary, JsonFormatter, PrettyPrinter};
use crate::progress::ProgressReporter;
use std::path::Path;

/// Execute a command, returning the process exit code
pub fn execute_command(command: Commands) -> Result<i32> {
    match command {
        Commands::Diff {
            source,
            target,
            keys,
            format,
            output,
            sample_cap,
            check,
        } => diff_command(
            &source,
            &target,
            &keys,
            &format,
            output.as_deref(),
            sample_cap,
            check,
        ),
        Commands::Inspect { input, format } => inspect_command(&input, &format),
    }
}

/// Compare two datasets and render the report
fn diff_command(
    source_path: &Path,
    target_path: &Path,
    keys: &[String],
    format: &str,
    output: Option<&Path>,
    sample_cap: usize,
    check: bool,
) -> Result<i32> {
    let format = OutputFormat::parse(format).map_err(CrossdiffError::config)?;

    let mut progress = match format {
        OutputFormat::Pretty => ProgressReporter::new(),
        OutputFormat::Json => ProgressReporter::new_minimal(),
    };

    let loader = DatasetLoader::new()?;
    let source = loader.load(source_path)?;
    let target = loader.load(target_path)?;
    progress.finish_load(&format!(
        "Loaded {} source rows and {} target rows",
        source.row_count(),
        target.row_count()
    ));

    let options = DiffOptions { sample_cap };
    let report = diff_datasets(&source, &target, keys, &options)?;
    progress.finish(&format!(
        "Comparison completed in {:.2}s",
        progress.elapsed_secs()
    ));

    match format {
        OutputFormat::Pretty => {
            println!();
            PrettyPrinter::print_diff_report(&report, crate::REPORT_VERSION);
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::format_report(&report, crate::REPORT_VERSION)?);
        }
    }

    if let Some(path) = output {
        std::fs::write(path, JsonFormatter::format_report(&report, crate::REPORT_VERSION)?)?;
        log::info!("report written to {}", path.display());
    }

    if check && report.has_differences() {
        log::info!(
            "check failed: {} removed, {} added, {} modified",
            report.removed,
            report.added,
            report.modified_rows_count
        );
        return Ok(2);
    }

    Ok(0)
}

/// Load one dataset and print its schema summary
fn inspect_command(input: &Path, format: &str) -> Result<i32> {
    let format = OutputFormat::parse(format).map_err(CrossdiffError::config)?;

    let loader = DatasetLoader::new()?;
    let dataset = loader.load(input)?;
    let summary = DatasetSummary::from_dataset(input, &dataset);

    match format {
        OutputFormat::Pretty => PrettyPrinter::print_dataset_summary(&summary),
        OutputFormat::Json => println!("{}", JsonFormatter::format_summary(&summary)?),
    }

    Ok(0)
}
