//! Key-based join between two indexed datasets
//!
//! Walks the smaller index's key set, pairing rows key by key. Duplicate key
//! groups are zipped by position up to the shorter group's length; surplus
//! rows in the longer group count as exclusive to their side. A full
//! cross-product over duplicate groups is never materialized.

use crate::index::KeyIndex;

/// One matched row pair: positions into the source and target datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedPair {
    pub source_row: u32,
    pub target_row: u32,
}

/// Result of joining two key indices
#[derive(Debug)]
pub struct JoinOutcome {
    /// Matched pairs, sorted by source row position
    pub pairs: Vec<MatchedPair>,
    /// Source rows with no (remaining) counterpart, unkeyable rows included
    pub source_exclusive: u64,
    /// Target rows with no (remaining) counterpart, unkeyable rows included
    pub target_exclusive: u64,
}

/// Join two key indices into matched pairs and per-side exclusivity counts.
pub fn join_indices(source: &KeyIndex, target: &KeyIndex) -> JoinOutcome {
    let source_is_smaller = source.key_count() <= target.key_count();
    let (small, large) = if source_is_smaller {
        (source, target)
    } else {
        (target, source)
    };

    let mut pairs = Vec::with_capacity(small.keyed_rows() as usize);
    let mut small_exclusive = 0u64;
    let mut large_exclusive = 0u64;
    let mut large_rows_seen = 0u64;

    for (digest, small_rows) in small.entries() {
        match large.entries().get(digest) {
            Some(large_rows) => {
                large_rows_seen += large_rows.len() as u64;
                let matched = small_rows.len().min(large_rows.len());
                for i in 0..matched {
                    let (s, t) = if source_is_smaller {
                        (small_rows[i], large_rows[i])
                    } else {
                        (large_rows[i], small_rows[i])
                    };
                    pairs.push(MatchedPair {
                        source_row: s,
                        target_row: t,
                    });
                }
                small_exclusive += (small_rows.len() - matched) as u64;
                large_exclusive += (large_rows.len() - matched) as u64;
            }
            None => small_exclusive += small_rows.len() as u64,
        }
    }

    // Keys the walk never visited live only in the larger index
    large_exclusive += large.keyed_rows() - large_rows_seen;

    let (mut source_exclusive, mut target_exclusive) = if source_is_smaller {
        (small_exclusive, large_exclusive)
    } else {
        (large_exclusive, small_exclusive)
    };
    source_exclusive += source.unkeyable_rows();
    target_exclusive += target.unkeyable_rows();

    // Hash-map iteration order must not leak into sample discovery order
    pairs.sort_unstable_by_key(|p| (p.source_row, p.target_row));

    JoinOutcome {
        pairs,
        source_exclusive,
        target_exclusive,
    }
}
