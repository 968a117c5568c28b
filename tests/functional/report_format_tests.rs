//! Tests for the rendered report document

use crate::common::{dataset, ints, keys, texts};
use crossdiff::diff::{diff_datasets, DiffOptions};
use crossdiff::output::JsonFormatter;
use crossdiff::{DataType, REPORT_VERSION};

fn sample_report() -> crossdiff::DiffReport {
    let a = dataset(vec![
        ("id", DataType::Integer, ints(&[1, 2, 3])),
        ("name", DataType::Text, texts(&["a", "b", "c"])),
        ("qty", DataType::Integer, ints(&[10, 20, 30])),
    ]);
    let b = dataset(vec![
        ("id", DataType::Integer, ints(&[1, 2, 4])),
        ("name", DataType::Text, texts(&["a", "B", "d"])),
        ("qty", DataType::Integer, ints(&[10, 20, 40])),
    ]);
    diff_datasets(&a, &b, &keys(&["id"]), &DiffOptions::default()).unwrap()
}

#[test]
fn test_json_document_contains_contract_fields() {
    let report = sample_report();
    let rendered = JsonFormatter::format_report(&report, REPORT_VERSION).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    for field in [
        "total_rows_a",
        "total_rows_b",
        "joined_count",
        "removed",
        "added",
        "identical_rows_count",
        "modified_rows_count",
        "column_stats",
    ] {
        assert!(value.get(field).is_some(), "missing field: {}", field);
    }
    assert_eq!(value["report_version"], REPORT_VERSION);

    let name_stat = &value["column_stats"]["name"];
    for field in [
        "is_key",
        "source_dtype",
        "target_dtype",
        "match_rate",
        "non_match_count",
        "null_count_diff",
        "all_match",
        "mismatched_sample_keys",
        "mismatched_value_samples",
    ] {
        assert!(
            name_stat.get(field).is_some(),
            "missing column stat field: {}",
            field
        );
    }
}

#[test]
fn test_json_round_trip() {
    let report = sample_report();
    let rendered = JsonFormatter::format_report(&report, REPORT_VERSION).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(value["total_rows_a"], 3);
    assert_eq!(value["joined_count"], 2);
    assert_eq!(value["removed"], 1);
    assert_eq!(value["added"], 1);
    assert_eq!(value["modified_rows_count"], 1);
    assert_eq!(value["column_stats"]["name"]["non_match_count"], 1);
    assert_eq!(value["column_stats"]["qty"]["all_match"], true);
    assert_eq!(value["column_stats"]["id"]["is_key"], true);
    assert_eq!(value["column_stats"]["name"]["source_dtype"], "TEXT");
}

#[test]
fn test_absent_max_diff_is_omitted_not_zero() {
    let report = sample_report();
    let rendered = JsonFormatter::format_report(&report, REPORT_VERSION).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    // "name" is textual: no numeric variance was measured, so no field at all
    assert!(value["column_stats"]["name"].get("max_value_diff").is_none());
    assert!(value["column_stats"]["qty"].get("max_value_diff").is_none());
}

#[test]
fn test_column_order_survives_serialization() {
    let report = sample_report();
    let rendered = JsonFormatter::format_report(&report, REPORT_VERSION).unwrap();

    let id_pos = rendered.find("\"id\"").unwrap();
    let name_pos = rendered.find("\"name\"").unwrap();
    let qty_pos = rendered.find("\"qty\"").unwrap();
    assert!(id_pos < name_pos && name_pos < qty_pos);
}
