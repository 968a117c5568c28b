//! Edge case tests for engine validation and unusual data shapes

use crate::common::{dataset, floats, ints, keys, texts};
use crossdiff::diff::{diff_datasets, DiffOptions};
use crossdiff::{CrossdiffError, DataType, Dataset, Value};

fn options() -> DiffOptions {
    DiffOptions::default()
}

#[test]
fn test_empty_key_list_is_config_error() {
    let a = dataset(vec![("id", DataType::Integer, ints(&[1]))]);
    let err = diff_datasets(&a, &a, &[], &options()).unwrap_err();
    assert!(matches!(err, CrossdiffError::Config { .. }));
}

#[test]
fn test_repeated_key_column_is_config_error() {
    let a = dataset(vec![("id", DataType::Integer, ints(&[1]))]);
    let err = diff_datasets(&a, &a, &keys(&["id", "id"]), &options()).unwrap_err();
    match err {
        CrossdiffError::Config { message } => assert!(message.contains("id")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_key_column_names_column_and_side() {
    let a = dataset(vec![
        ("id", DataType::Integer, ints(&[1])),
        ("v", DataType::Text, texts(&["x"])),
    ]);
    let b = dataset(vec![("v", DataType::Text, texts(&["x"]))]);

    let err = diff_datasets(&a, &b, &keys(&["id"]), &options()).unwrap_err();
    match err {
        CrossdiffError::MissingColumn { column, side } => {
            assert_eq!(column, "id");
            assert_eq!(side, "target");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_zero_column_dataset_is_config_error() {
    let a = dataset(vec![("id", DataType::Integer, ints(&[1]))]);
    let empty = Dataset::new();
    let err = diff_datasets(&a, &empty, &keys(&["id"]), &options()).unwrap_err();
    match err {
        CrossdiffError::Config { message } => assert!(message.contains("target")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_zero_row_datasets_are_valid() {
    let a = dataset(vec![
        ("id", DataType::Integer, vec![]),
        ("v", DataType::Text, vec![]),
    ]);

    let report = diff_datasets(&a, &a, &keys(&["id"]), &options()).unwrap();

    assert_eq!(report.joined_count, 0);
    assert_eq!(report.removed, 0);
    assert_eq!(report.added, 0);
    assert_eq!(report.column_stats["v"].match_rate, 100.0);
}

#[test]
fn test_all_null_keys_make_every_row_exclusive() {
    let a = dataset(vec![
        ("id", DataType::Integer, vec![Value::Null, Value::Null]),
        ("v", DataType::Text, texts(&["a", "b"])),
    ]);
    let b = a.clone();

    let report = diff_datasets(&a, &b, &keys(&["id"]), &options()).unwrap();

    assert_eq!(report.joined_count, 0);
    assert_eq!(report.removed, 2);
    assert_eq!(report.added, 2);
    assert_eq!(report.unkeyable_rows_a, 2);
    assert_eq!(report.unkeyable_rows_b, 2);
}

#[test]
fn test_nan_values_mismatch_without_poisoning_variance() {
    let a = dataset(vec![
        ("id", DataType::Integer, ints(&[1, 2])),
        ("v", DataType::Float, floats(&[f64::NAN, 1.0])),
    ]);
    let b = dataset(vec![
        ("id", DataType::Integer, ints(&[1, 2])),
        ("v", DataType::Float, floats(&[0.0, 3.5])),
    ]);

    let report = diff_datasets(&a, &b, &keys(&["id"]), &options()).unwrap();

    let stat = &report.column_stats["v"];
    assert_eq!(stat.non_match_count, 2);
    // the NaN pair contributes no delta; only the finite mismatch does
    assert_eq!(stat.max_value_diff, Some(2.5));
}

#[test]
fn test_type_shift_to_text_compares_rendered_values() {
    let a = dataset(vec![
        ("id", DataType::Integer, ints(&[1, 2])),
        ("code", DataType::Integer, ints(&[7, 8])),
    ]);
    let b = dataset(vec![
        ("id", DataType::Integer, ints(&[1, 2])),
        ("code", DataType::Text, texts(&["7", "nine"])),
    ]);

    let report = diff_datasets(&a, &b, &keys(&["id"]), &options()).unwrap();

    let stat = &report.column_stats["code"];
    assert!(stat.has_type_shift());
    // best-effort rendered comparison still matches "7" to 7
    assert_eq!(stat.non_match_count, 1);
    assert_eq!(stat.mismatched_value_samples, vec!["8 -> nine".to_string()]);
}

#[test]
fn test_duplicate_groups_on_both_sides_never_cross_product() {
    let a = dataset(vec![
        ("id", DataType::Integer, ints(&[5, 5, 5])),
        ("v", DataType::Text, texts(&["a", "b", "c"])),
    ]);
    let b = dataset(vec![
        ("id", DataType::Integer, ints(&[5, 5])),
        ("v", DataType::Text, texts(&["a", "b"])),
    ]);

    let report = diff_datasets(&a, &b, &keys(&["id"]), &options()).unwrap();

    // 3x2 duplicates pair to min(3,2)=2, never 6
    assert_eq!(report.joined_count, 2);
    assert_eq!(report.removed, 1);
    assert_eq!(report.added, 0);
    assert_eq!(report.modified_rows_count, 0);
}

#[test]
fn test_boolean_and_timestamp_columns_compare_natively() {
    use chrono::NaiveDate;

    let ts = |d: u32| {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Value::Timestamp)
            .unwrap_or(Value::Null)
    };

    let a = dataset(vec![
        ("id", DataType::Integer, ints(&[1, 2])),
        (
            "active",
            DataType::Boolean,
            vec![Value::Boolean(true), Value::Boolean(false)],
        ),
        ("seen", DataType::Timestamp, vec![ts(1), ts(2)]),
    ]);
    let b = dataset(vec![
        ("id", DataType::Integer, ints(&[1, 2])),
        (
            "active",
            DataType::Boolean,
            vec![Value::Boolean(true), Value::Boolean(true)],
        ),
        ("seen", DataType::Timestamp, vec![ts(1), ts(3)]),
    ]);

    let report = diff_datasets(&a, &b, &keys(&["id"]), &options()).unwrap();

    assert_eq!(report.column_stats["active"].non_match_count, 1);
    let seen = &report.column_stats["seen"];
    assert_eq!(seen.non_match_count, 1);
    // timestamps are not numeric columns; no variance is tracked
    assert!(seen.max_value_diff.is_none());
    assert_eq!(report.modified_rows_count, 1);
}
