//! Output formatting utilities
//!
//! The engine's report is the sole input here; rendering never feeds back
//! into comparison. The report version is passed in by the caller rather
//! than read from anywhere global.

use crate::dataset::{DataType, Dataset};
use crate::diff::DiffReport;
use crate::error::Result;
use serde::Serialize;
use std::path::Path;

/// Pretty printer for terminal output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the comparison report as a tree
    pub fn print_diff_report(report: &DiffReport, version: &str) {
        println!("🔍 crossdiff report (engine v{})", version);
        println!("├─ Rows in source: {}", report.total_rows_a);
        println!("├─ Rows in target: {}", report.total_rows_b);
        println!("├─ Matched pairs: {}", report.joined_count);
        println!("├─ Removed (source only): {}", report.removed);
        println!("├─ Added (target only): {}", report.added);
        println!("├─ Identical rows: {}", report.identical_rows_count);
        println!("└─ Modified rows: {}", report.modified_rows_count);

        if report.unkeyable_rows_a > 0 || report.unkeyable_rows_b > 0 {
            println!(
                "⚠️  Rows with null key components: {} source, {} target (treated as exclusive)",
                report.unkeyable_rows_a, report.unkeyable_rows_b
            );
        }
        if report.duplicate_key_rows_a > 0 || report.duplicate_key_rows_b > 0 {
            println!(
                "⚠️  Rows with duplicate keys: {} source, {} target (paired by position)",
                report.duplicate_key_rows_a, report.duplicate_key_rows_b
            );
        }

        println!();
        println!("📊 Column statistics ({} tracked)", report.column_stats.len());
        let last = report.column_stats.len().saturating_sub(1);
        for (i, (name, stat)) in report.column_stats.iter().enumerate() {
            let prefix = if i == last { "└─" } else { "├─" };
            let status = if stat.all_match { "✅" } else { "❌" };
            let key_badge = if stat.is_key { " [key]" } else { "" };
            let type_note = if stat.has_type_shift() {
                format!(" ({} -> {})", stat.source_dtype, stat.target_dtype)
            } else {
                String::new()
            };
            let max_diff = match stat.max_value_diff {
                Some(d) => format!(", max diff {:.4}", d),
                None => String::new(),
            };
            println!(
                "{} {} {}{}{}: {:.1}% match, {} mismatches, null diff {:+}{}",
                prefix,
                status,
                name,
                key_badge,
                type_note,
                stat.match_rate,
                stat.non_match_count,
                stat.null_count_diff,
                max_diff
            );
        }

        let flagged: Vec<_> = report
            .column_stats
            .iter()
            .filter(|(_, stat)| !stat.mismatched_sample_keys.is_empty())
            .collect();
        if !flagged.is_empty() {
            println!();
            println!("✏️  Mismatch samples (key: source -> target)");
            for (name, stat) in flagged {
                println!("├─ {}", name);
                let last = stat.mismatched_sample_keys.len().saturating_sub(1);
                for (i, (key, sample)) in stat
                    .mismatched_sample_keys
                    .iter()
                    .zip(&stat.mismatched_value_samples)
                    .enumerate()
                {
                    let prefix = if i == last { "│  └─" } else { "│  ├─" };
                    println!("{} {}: {}", prefix, key, sample);
                }
            }
        }
    }

    /// Print a single dataset's schema summary
    pub fn print_dataset_summary(summary: &DatasetSummary) {
        println!("📄 {}", summary.source);
        println!("├─ Rows: {}", summary.row_count);
        println!("└─ Columns: {}", summary.columns.len());
        let last = summary.columns.len().saturating_sub(1);
        for (i, column) in summary.columns.iter().enumerate() {
            let prefix = if i == last { "   └─" } else { "   ├─" };
            println!(
                "{} {} ({}, {} nulls)",
                prefix, column.name, column.dtype, column.null_count
            );
        }
    }
}

/// JSON document assembly for reports and summaries
pub struct JsonFormatter;

impl JsonFormatter {
    /// Serialize the report, stamping in the report version
    pub fn format_report(report: &DiffReport, version: &str) -> Result<String> {
        let mut value = serde_json::to_value(report)?;
        if let Some(map) = value.as_object_mut() {
            map.insert(
                "report_version".to_string(),
                serde_json::Value::String(version.to_string()),
            );
        }
        Ok(serde_json::to_string_pretty(&value)?)
    }

    pub fn format_summary(summary: &DatasetSummary) -> Result<String> {
        Ok(serde_json::to_string_pretty(summary)?)
    }
}

/// Schema summary of one loaded dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub source: String,
    pub row_count: u64,
    pub columns: Vec<ColumnSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: DataType,
    pub null_count: u64,
}

impl DatasetSummary {
    pub fn from_dataset(path: &Path, dataset: &Dataset) -> Self {
        Self {
            source: path.display().to_string(),
            row_count: dataset.row_count() as u64,
            columns: dataset
                .columns()
                .map(|c| ColumnSummary {
                    name: c.name().to_string(),
                    dtype: c.dtype(),
                    null_count: c.null_count() as u64,
                })
                .collect(),
        }
    }
}
