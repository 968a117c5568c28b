//! Key tuple indexing
//!
//! Builds a hash-based index from the key-column tuple of one dataset to the
//! row positions sharing that tuple. Rows with a null in any key component
//! cannot participate in matching and are counted as unkeyable instead.

use crate::dataset::{Column, Dataset, Value};
use crate::error::{CrossdiffError, Result};
use blake3::Hasher;
use std::collections::HashMap;

/// Fixed-width digest of one key tuple
pub type KeyDigest = [u8; 32];

/// Index from key tuple digest to the ordered row positions sharing it
#[derive(Debug)]
pub struct KeyIndex {
    entries: HashMap<KeyDigest, Vec<u32>>,
    keyed_rows: u64,
    unkeyable_rows: u64,
    duplicate_rows: u64,
}

impl KeyIndex {
    /// Build the index for `dataset` over `key_columns`.
    ///
    /// Fails if a named key column is absent. `side` names the dataset in
    /// that error ("source" or "target").
    pub fn build(dataset: &Dataset, key_columns: &[String], side: &'static str) -> Result<Self> {
        let columns: Vec<&Column> = key_columns
            .iter()
            .map(|name| {
                dataset
                    .column(name)
                    .ok_or_else(|| CrossdiffError::missing_column(name, side))
            })
            .collect::<Result<_>>()?;

        let mut entries: HashMap<KeyDigest, Vec<u32>> = HashMap::new();
        let mut keyed_rows = 0u64;
        let mut unkeyable_rows = 0u64;

        for row in 0..dataset.row_count() {
            if columns.iter().any(|c| c.value(row).is_null()) {
                unkeyable_rows += 1;
                continue;
            }
            let digest = digest_key(&columns, row);
            entries.entry(digest).or_default().push(row as u32);
            keyed_rows += 1;
        }

        let duplicate_rows = entries
            .values()
            .filter(|rows| rows.len() > 1)
            .map(|rows| rows.len() as u64)
            .sum();

        Ok(Self {
            entries,
            keyed_rows,
            unkeyable_rows,
            duplicate_rows,
        })
    }

    pub fn entries(&self) -> &HashMap<KeyDigest, Vec<u32>> {
        &self.entries
    }

    /// Number of distinct key tuples
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Rows that carry a complete key tuple
    pub fn keyed_rows(&self) -> u64 {
        self.keyed_rows
    }

    /// Rows excluded from matching because a key component was null
    pub fn unkeyable_rows(&self) -> u64 {
        self.unkeyable_rows
    }

    /// Rows belonging to a key tuple shared by two or more rows
    pub fn duplicate_rows(&self) -> u64 {
        self.duplicate_rows
    }
}

/// Digest the key tuple of one row.
///
/// Components are tagged with a type byte and separated so that adjacent
/// values cannot run together. Numeric components are canonicalized: a float
/// with no fractional part digests as the equal integer, so an integer key
/// on one side still matches a float-widened key on the other.
fn digest_key(columns: &[&Column], row: usize) -> KeyDigest {
    let mut hasher = Hasher::new();
    for column in columns {
        write_component(&mut hasher, column.value(row));
        hasher.update(b"|");
    }
    *hasher.finalize().as_bytes()
}

fn write_component(hasher: &mut Hasher, value: &Value) {
    match value {
        // Unkeyable rows never reach the digest; tag defensively anyway
        Value::Null => {
            hasher.update(b"n");
        }
        Value::Integer(i) => {
            hasher.update(b"i");
            hasher.update(&i.to_le_bytes());
        }
        Value::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                hasher.update(b"i");
                hasher.update(&(*f as i64).to_le_bytes());
            } else {
                hasher.update(b"f");
                hasher.update(&f.to_bits().to_le_bytes());
            }
        }
        Value::Text(s) => {
            hasher.update(b"s");
            hasher.update(s.as_bytes());
        }
        Value::Boolean(b) => {
            hasher.update(b"b");
            hasher.update(&[*b as u8]);
        }
        Value::Timestamp(ts) => {
            hasher.update(b"t");
            hasher.update(&ts.and_utc().timestamp_micros().to_le_bytes());
        }
    }
}
