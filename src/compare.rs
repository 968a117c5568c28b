//! Per-column value comparison over matched row pairs
//!
//! Each shared column gets one comparison strategy, selected once from the
//! two declared types, then a single pass over the matched pairs accumulates
//! the column's statistics. Comparisons are pure reductions over read-only
//! data, so columns can be compared on worker threads independently.

use crate::dataset::{Column, DataType, Dataset, Value};
use crate::error::{CrossdiffError, Result};
use crate::join::MatchedPair;
use serde::{Deserialize, Serialize};

/// Comparison statistics for one column shared by both datasets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStat {
    pub is_key: bool,
    pub source_dtype: DataType,
    pub target_dtype: DataType,
    /// equal pairs / compared pairs * 100; 100 when nothing was comparable
    pub match_rate: f64,
    /// Pairs with at least one non-null side
    pub compared_count: u64,
    pub non_match_count: u64,
    /// Target-side nulls minus source-side nulls among compared pairs
    pub null_count_diff: i64,
    /// Largest |source - target| over mismatching numeric pairs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value_diff: Option<f64>,
    pub all_match: bool,
    pub mismatched_sample_keys: Vec<String>,
    pub mismatched_value_samples: Vec<String>,
}

impl ColumnStat {
    /// Stat for a key column: equal on every matched pair by construction,
    /// but both declared types are still recorded so type shifts stay
    /// visible.
    pub fn for_key(source_dtype: DataType, target_dtype: DataType, compared: u64) -> Self {
        Self {
            is_key: true,
            source_dtype,
            target_dtype,
            match_rate: 100.0,
            compared_count: compared,
            non_match_count: 0,
            null_count_diff: 0,
            max_value_diff: None,
            all_match: true,
            mismatched_sample_keys: Vec::new(),
            mismatched_value_samples: Vec::new(),
        }
    }

    pub fn has_type_shift(&self) -> bool {
        self.source_dtype != self.target_dtype
    }
}

/// Closed set of comparison strategies, selected once per column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareStrategy {
    /// Native equality for identical non-numeric types
    Identity,
    /// Numeric equality with variance tracking for integer/float columns
    Numeric,
    /// Rendered-form equality for shifted, non-comparable type pairs
    Textual,
}

impl CompareStrategy {
    pub fn select(source: DataType, target: DataType) -> Self {
        if source.is_numeric() && target.is_numeric() {
            CompareStrategy::Numeric
        } else if source == target {
            CompareStrategy::Identity
        } else {
            CompareStrategy::Textual
        }
    }

    fn values_equal(&self, source: &Value, target: &Value) -> bool {
        match self {
            CompareStrategy::Identity => source == target,
            CompareStrategy::Numeric => match (source, target) {
                (Value::Integer(a), Value::Integer(b)) => a == b,
                _ => match (source.as_f64(), target.as_f64()) {
                    (Some(a), Some(b)) => a == b,
                    _ => source.to_string() == target.to_string(),
                },
            },
            CompareStrategy::Textual => source.to_string() == target.to_string(),
        }
    }

    fn numeric_delta(&self, source: &Value, target: &Value) -> Option<f64> {
        if *self != CompareStrategy::Numeric {
            return None;
        }
        match (source.as_f64(), target.as_f64()) {
            // non-finite deltas (NaN sides, infinities) would poison the max
            (Some(a), Some(b)) => Some((a - b).abs()).filter(|d| d.is_finite()),
            _ => None,
        }
    }
}

/// Renders the key tuple of a source row for mismatch samples
pub struct KeyFormatter<'a> {
    columns: Vec<&'a Column>,
}

impl<'a> KeyFormatter<'a> {
    pub fn new(dataset: &'a Dataset, key_columns: &[String]) -> Result<Self> {
        let columns = key_columns
            .iter()
            .map(|name| {
                dataset
                    .column(name)
                    .ok_or_else(|| CrossdiffError::missing_column(name, "source"))
            })
            .collect::<Result<_>>()?;
        Ok(Self { columns })
    }

    pub fn format(&self, row: u32) -> String {
        self.columns
            .iter()
            .map(|c| c.value(row as usize).to_string())
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Per-pair mismatch bitmask for one column.
///
/// The aggregator needs to know which specific pairs mismatched somewhere,
/// not just how many mismatches each column saw; column-level counts alone
/// would double-count a pair that differs in two columns.
#[derive(Debug, Clone)]
pub struct PairMask {
    words: Vec<u64>,
    len: usize,
}

impl PairMask {
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    pub fn set(&mut self, idx: usize) {
        debug_assert!(idx < self.len);
        self.words[idx / 64] |= 1u64 << (idx % 64);
    }

    pub fn get(&self, idx: usize) -> bool {
        self.words[idx / 64] & (1u64 << (idx % 64)) != 0
    }

    pub fn merge(&mut self, other: &PairMask) {
        debug_assert_eq!(self.len, other.len);
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word |= other_word;
        }
    }

    /// Number of pairs flagged as mismatching
    pub fn set_count(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }
}

/// Compare one shared column across all matched pairs.
pub fn compare_column(
    source: &Column,
    target: &Column,
    pairs: &[MatchedPair],
    keys: &KeyFormatter<'_>,
    sample_cap: usize,
) -> (ColumnStat, PairMask) {
    let strategy = CompareStrategy::select(source.dtype(), target.dtype());

    let mut compared = 0u64;
    let mut equal = 0u64;
    let mut mismatched = 0u64;
    let mut source_nulls = 0u64;
    let mut target_nulls = 0u64;
    let mut max_value_diff: Option<f64> = None;
    let mut mask = PairMask::new(pairs.len());
    let mut sample_keys = Vec::new();
    let mut sample_values = Vec::new();

    for (i, pair) in pairs.iter().enumerate() {
        let a = source.value(pair.source_row as usize);
        let b = target.value(pair.target_row as usize);

        match (a.is_null(), b.is_null()) {
            // both sides absent: nothing to compare
            (true, true) => continue,
            (true, false) => {
                compared += 1;
                mismatched += 1;
                source_nulls += 1;
                mask.set(i);
                record_sample(&mut sample_keys, &mut sample_values, sample_cap, keys, pair, a, b);
            }
            (false, true) => {
                compared += 1;
                mismatched += 1;
                target_nulls += 1;
                mask.set(i);
                record_sample(&mut sample_keys, &mut sample_values, sample_cap, keys, pair, a, b);
            }
            (false, false) => {
                compared += 1;
                if strategy.values_equal(a, b) {
                    equal += 1;
                } else {
                    mismatched += 1;
                    mask.set(i);
                    if let Some(delta) = strategy.numeric_delta(a, b) {
                        max_value_diff = Some(max_value_diff.map_or(delta, |m| m.max(delta)));
                    }
                    record_sample(
                        &mut sample_keys,
                        &mut sample_values,
                        sample_cap,
                        keys,
                        pair,
                        a,
                        b,
                    );
                }
            }
        }
    }

    let match_rate = if compared == 0 {
        100.0
    } else {
        equal as f64 / compared as f64 * 100.0
    };

    let stat = ColumnStat {
        is_key: false,
        source_dtype: source.dtype(),
        target_dtype: target.dtype(),
        match_rate,
        compared_count: compared,
        non_match_count: mismatched,
        null_count_diff: target_nulls as i64 - source_nulls as i64,
        max_value_diff,
        all_match: mismatched == 0,
        mismatched_sample_keys: sample_keys,
        mismatched_value_samples: sample_values,
    };
    (stat, mask)
}

fn record_sample(
    sample_keys: &mut Vec<String>,
    sample_values: &mut Vec<String>,
    cap: usize,
    keys: &KeyFormatter<'_>,
    pair: &MatchedPair,
    source: &Value,
    target: &Value,
) {
    if sample_keys.len() < cap {
        sample_keys.push(keys.format(pair.source_row));
        sample_values.push(format!("{} -> {}", source, target));
    }
}
