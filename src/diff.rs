//! Dataset diff engine entry point and result aggregation
//!
//! Orchestrates the three phases: key index build, join, and the per-column
//! comparison fan-out. Index build and join are sequential dependencies; the
//! comparators are independent pure reductions and run in parallel, one task
//! per shared column.

use crate::compare::{compare_column, ColumnStat, KeyFormatter, PairMask};
use crate::dataset::{Column, Dataset};
use crate::error::{CrossdiffError, Result};
use crate::index::KeyIndex;
use crate::join::join_indices;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Engine tuning knobs
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Cap on mismatch samples retained per column
    pub sample_cap: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            sample_cap: crate::DEFAULT_SAMPLE_CAP,
        }
    }
}

/// The complete result of one dataset comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffReport {
    pub total_rows_a: u64,
    pub total_rows_b: u64,
    /// Matched pairs eligible for value comparison
    pub joined_count: u64,
    /// Rows exclusive to the source dataset
    pub removed: u64,
    /// Rows exclusive to the target dataset
    pub added: u64,
    /// Matched pairs equal in every compared column
    pub identical_rows_count: u64,
    /// Matched pairs with at least one mismatching column
    pub modified_rows_count: u64,
    /// Rows excluded from matching by a null key component, per side
    pub unkeyable_rows_a: u64,
    pub unkeyable_rows_b: u64,
    /// Rows sharing a key tuple with another row on the same side
    pub duplicate_key_rows_a: u64,
    pub duplicate_key_rows_b: u64,
    /// Per-column statistics: key columns first, then shared columns in
    /// source input order
    pub column_stats: IndexMap<String, ColumnStat>,
}

impl DiffReport {
    /// True when any row was added, removed, or modified
    pub fn has_differences(&self) -> bool {
        self.removed > 0 || self.added > 0 || self.modified_rows_count > 0
    }
}

/// Compare two datasets joined on `key_columns`.
///
/// The datasets must both carry every key column; other columns are compared
/// only when present on both sides. The inputs are read-only and no state
/// survives the call.
pub fn diff_datasets(
    source: &Dataset,
    target: &Dataset,
    key_columns: &[String],
    options: &DiffOptions,
) -> Result<DiffReport> {
    validate_config(source, target, key_columns)?;

    let source_index = KeyIndex::build(source, key_columns, "source")?;
    let target_index = KeyIndex::build(target, key_columns, "target")?;

    if source_index.duplicate_rows() > 0 {
        log::warn!(
            "source dataset has {} rows with duplicate keys; pairing by position within each group",
            source_index.duplicate_rows()
        );
    }
    if target_index.duplicate_rows() > 0 {
        log::warn!(
            "target dataset has {} rows with duplicate keys; pairing by position within each group",
            target_index.duplicate_rows()
        );
    }

    let outcome = join_indices(&source_index, &target_index);
    let joined_count = outcome.pairs.len() as u64;
    log::debug!(
        "join produced {} pairs, {} source-exclusive, {} target-exclusive",
        joined_count,
        outcome.source_exclusive,
        outcome.target_exclusive
    );

    let key_set: HashSet<&str> = key_columns.iter().map(|s| s.as_str()).collect();
    let shared: Vec<(&Column, &Column)> = source
        .columns()
        .filter(|col| !key_set.contains(col.name()))
        .filter_map(|col| match target.column(col.name()) {
            Some(target_col) => Some((col, target_col)),
            None => {
                log::debug!(
                    "skipping column '{}': missing from target dataset",
                    col.name()
                );
                None
            }
        })
        .collect();

    let keys = KeyFormatter::new(source, key_columns)?;
    let compared: Vec<(&str, ColumnStat, PairMask)> = shared
        .par_iter()
        .map(|(source_col, target_col)| {
            let (stat, mask) = compare_column(
                source_col,
                target_col,
                &outcome.pairs,
                &keys,
                options.sample_cap,
            );
            (source_col.name(), stat, mask)
        })
        .collect();

    let mut column_stats = IndexMap::with_capacity(key_columns.len() + compared.len());
    for name in key_columns {
        let source_dtype = source
            .column(name)
            .map(|c| c.dtype())
            .ok_or_else(|| CrossdiffError::missing_column(name, "source"))?;
        let target_dtype = target
            .column(name)
            .map(|c| c.dtype())
            .ok_or_else(|| CrossdiffError::missing_column(name, "target"))?;
        let stat = ColumnStat::for_key(source_dtype, target_dtype, joined_count);
        if stat.has_type_shift() {
            log::warn!(
                "key column '{}' type shift: {} -> {}",
                name,
                stat.source_dtype,
                stat.target_dtype
            );
        }
        column_stats.insert(name.clone(), stat);
    }

    let mut mismatch_mask = PairMask::new(outcome.pairs.len());
    for (name, stat, mask) in compared {
        if stat.has_type_shift() {
            log::warn!(
                "column '{}' type shift: {} -> {}",
                name,
                stat.source_dtype,
                stat.target_dtype
            );
        }
        mismatch_mask.merge(&mask);
        column_stats.insert(name.to_string(), stat);
    }

    let modified_rows_count = mismatch_mask.set_count();

    Ok(DiffReport {
        total_rows_a: source.row_count() as u64,
        total_rows_b: target.row_count() as u64,
        joined_count,
        removed: outcome.source_exclusive,
        added: outcome.target_exclusive,
        identical_rows_count: joined_count - modified_rows_count,
        modified_rows_count,
        unkeyable_rows_a: source_index.unkeyable_rows(),
        unkeyable_rows_b: target_index.unkeyable_rows(),
        duplicate_key_rows_a: source_index.duplicate_rows(),
        duplicate_key_rows_b: target_index.duplicate_rows(),
        column_stats,
    })
}

fn validate_config(source: &Dataset, target: &Dataset, key_columns: &[String]) -> Result<()> {
    if key_columns.is_empty() {
        return Err(CrossdiffError::config(
            "key column list is empty; a join on no columns is ill-defined",
        ));
    }

    let mut seen = HashSet::new();
    for name in key_columns {
        if !seen.insert(name.as_str()) {
            return Err(CrossdiffError::config(format!(
                "key column '{}' listed more than once",
                name
            )));
        }
    }

    if source.column_count() == 0 {
        return Err(CrossdiffError::config("source dataset has no columns"));
    }
    if target.column_count() == 0 {
        return Err(CrossdiffError::config("target dataset has no columns"));
    }

    Ok(())
}
