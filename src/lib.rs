//! # crossdiff
//!
//! A key-based dataset comparison tool: joins two tabular datasets on a set
//! of key columns and reports, per column, how values diverge between the
//! two sides.

pub mod cli;
pub mod commands;
pub mod compare;
pub mod dataset;
pub mod diff;
pub mod error;
pub mod index;
pub mod join;
pub mod loader;
pub mod output;
pub mod progress;

pub use dataset::{Column, DataType, Dataset, Value};
pub use diff::{diff_datasets, DiffOptions, DiffReport};
pub use error::{CrossdiffError, Result};

/// Version stamp written into rendered reports
pub const REPORT_VERSION: &str = "1.0.0";

/// Default cap on mismatch samples retained per column
pub const DEFAULT_SAMPLE_CAP: usize = 10;
