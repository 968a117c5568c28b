//! Dataset loading via DuckDB
//!
//! One engine reads every supported format. The loader creates an in-memory
//! view over the input file, picks the reader from the file extension, and
//! materializes the view into a typed `Dataset`. Insertion order is left
//! untouched so row positions are stable across a run.

use crate::dataset::{Column, DataType, Dataset, Value};
use crate::error::{CrossdiffError, Result};
use chrono::{DateTime, NaiveTime};
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::Connection;
use std::path::Path;

/// Loads files into in-memory datasets through DuckDB
pub struct DatasetLoader {
    connection: Connection,
}

impl DatasetLoader {
    pub fn new() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute("SET enable_progress_bar=false", [])?;
        connection.execute("SET enable_object_cache=true", [])?;
        Ok(Self { connection })
    }

    /// Load one file into a `Dataset`, resolving the reader by extension.
    pub fn load(&self, file_path: &Path) -> Result<Dataset> {
        if !file_path.exists() {
            return Err(CrossdiffError::invalid_input(format!(
                "File not found: {}",
                file_path.display()
            )));
        }
        if !file_path.is_file() {
            return Err(CrossdiffError::invalid_input(format!(
                "Path is not a file: {}",
                file_path.display()
            )));
        }

        let create_view_sql = format!(
            "CREATE OR REPLACE VIEW dataset_view AS SELECT * FROM {}",
            reader_clause(file_path)
        );
        self.connection
            .execute(&create_view_sql, [])
            .map_err(|e| convert_duckdb_error(e, file_path))?;

        let schema = self.describe_view()?;
        if schema.is_empty() {
            return Err(CrossdiffError::data_processing(format!(
                "no columns found in '{}'",
                file_path.display()
            )));
        }

        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); schema.len()];
        let column_count = schema.len();

        let mut stmt = self
            .connection
            .prepare("SELECT * FROM dataset_view")
            .map_err(|e| {
                CrossdiffError::data_processing(format!("Failed to prepare data query: {}", e))
            })?;
        let rows = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(decode_value(row.get_ref(i)?));
                }
                Ok(values)
            })
            .map_err(|e| {
                CrossdiffError::data_processing(format!("Failed to extract data rows: {}", e))
            })?;

        for row in rows {
            let values = row.map_err(|e| {
                CrossdiffError::data_processing(format!("Failed to process data row: {}", e))
            })?;
            for (i, value) in values.into_iter().enumerate() {
                columns[i].push(value);
            }
        }

        let mut dataset_columns = Vec::with_capacity(column_count);
        for ((name, dtype), values) in schema.into_iter().zip(columns) {
            dataset_columns.push(Column::new(name, dtype, values));
        }
        let dataset = Dataset::from_columns(dataset_columns)?;
        log::debug!(
            "loaded '{}': {} rows, {} columns",
            file_path.display(),
            dataset.row_count(),
            dataset.column_count()
        );
        Ok(dataset)
    }

    /// Column names and mapped types of the current view, in declared order
    fn describe_view(&self) -> Result<Vec<(String, DataType)>> {
        let mut stmt = self.connection.prepare("DESCRIBE dataset_view").map_err(|e| {
            CrossdiffError::data_processing(format!("Failed to prepare describe query: {}", e))
        })?;

        let rows = stmt
            .query_map([], |row| {
                let name: String = row.get(0)?;
                let declared: String = row.get(1)?;
                Ok((name, declared))
            })
            .map_err(|e| {
                CrossdiffError::data_processing(format!("Failed to query column info: {}", e))
            })?;

        let mut schema = Vec::new();
        for row in rows {
            let (name, declared) = row.map_err(|e| {
                CrossdiffError::data_processing(format!("Failed to process column info: {}", e))
            })?;
            let dtype = map_column_type(&declared);
            log::debug!("column '{}': {} -> {}", name, declared, dtype);
            schema.push((name, dtype));
        }
        Ok(schema)
    }
}

/// Pick the DuckDB reader for a file based on its extension
fn reader_clause(file_path: &Path) -> String {
    let quoted = file_path.to_string_lossy().replace('\'', "''");
    let extension = file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") | Some("tsv") => format!("read_csv_auto('{}')", quoted),
        Some("json") | Some("jsonl") | Some("ndjson") => format!("read_json_auto('{}')", quoted),
        Some("parquet") | Some("pq") => format!("read_parquet('{}')", quoted),
        // let DuckDB sniff anything else
        _ => format!("'{}'", quoted),
    }
}

/// Map a DuckDB declared type onto the closed comparison type set
fn map_column_type(declared: &str) -> DataType {
    let upper = declared.to_ascii_uppercase();
    if upper.contains("TIMESTAMP") || upper.contains("DATE") {
        DataType::Timestamp
    } else if upper.contains("BOOL") {
        DataType::Boolean
    } else if upper.contains("INT") {
        DataType::Integer
    } else if upper.contains("FLOAT")
        || upper.contains("DOUBLE")
        || upper.contains("REAL")
        || upper.contains("DECIMAL")
        || upper.contains("NUMERIC")
    {
        DataType::Float
    } else {
        DataType::Text
    }
}

/// Decode one DuckDB cell into a `Value`. Conversion is total: anything the
/// model cannot represent degrades to text or null rather than failing the
/// load.
fn decode_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Boolean(b),
        ValueRef::TinyInt(i) => Value::Integer(i as i64),
        ValueRef::SmallInt(i) => Value::Integer(i as i64),
        ValueRef::Int(i) => Value::Integer(i as i64),
        ValueRef::BigInt(i) => Value::Integer(i),
        ValueRef::HugeInt(i) => match i64::try_from(i) {
            Ok(v) => Value::Integer(v),
            Err(_) => Value::Float(i as f64),
        },
        ValueRef::UTinyInt(i) => Value::Integer(i as i64),
        ValueRef::USmallInt(i) => Value::Integer(i as i64),
        ValueRef::UInt(i) => Value::Integer(i as i64),
        ValueRef::UBigInt(i) => match i64::try_from(i) {
            Ok(v) => Value::Integer(v),
            Err(_) => Value::Float(i as f64),
        },
        ValueRef::Float(f) => Value::Float(f as f64),
        ValueRef::Double(f) => Value::Float(f),
        ValueRef::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or(Value::Null),
        ValueRef::Text(s) => Value::Text(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => Value::Text(format!("<blob:{} bytes>", b.len())),
        ValueRef::Date32(days) => DateTime::from_timestamp(days as i64 * 86_400, 0)
            .map(|dt| Value::Timestamp(dt.naive_utc()))
            .unwrap_or(Value::Null),
        ValueRef::Timestamp(unit, raw) => timestamp_from_raw(unit, raw),
        ValueRef::Time64(unit, raw) => time_text_from_raw(unit, raw),
        _ => Value::Null,
    }
}

fn timestamp_from_raw(unit: TimeUnit, raw: i64) -> Value {
    // DuckDB surfaces TIMESTAMP columns in microseconds
    let micros = match unit {
        TimeUnit::Second => raw.checked_mul(1_000_000),
        TimeUnit::Millisecond => raw.checked_mul(1_000),
        TimeUnit::Microsecond => Some(raw),
        TimeUnit::Nanosecond => Some(raw / 1_000),
    };
    micros
        .and_then(DateTime::from_timestamp_micros)
        .map(|dt| Value::Timestamp(dt.naive_utc()))
        .unwrap_or(Value::Null)
}

/// Render a TIME cell as HH:MM:SS text; the comparison model has no
/// time-of-day type of its own
fn time_text_from_raw(unit: TimeUnit, raw: i64) -> Value {
    let micros = match unit {
        TimeUnit::Second => raw.saturating_mul(1_000_000),
        TimeUnit::Millisecond => raw.saturating_mul(1_000),
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    };
    let seconds = (micros / 1_000_000).clamp(0, 86_399) as u32;
    let nanos = ((micros % 1_000_000).max(0) * 1_000) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos)
        .map(|t| Value::Text(t.to_string()))
        .unwrap_or(Value::Null)
}

/// Translate common DuckDB read failures into clearer input errors
fn convert_duckdb_error(error: duckdb::Error, file_path: &Path) -> CrossdiffError {
    let error_msg = error.to_string();

    if error_msg.contains("CSV Error")
        || error_msg.contains("Could not convert")
        || error_msg.contains("Invalid CSV")
    {
        CrossdiffError::invalid_input(format!(
            "Malformed CSV file '{}': {}",
            file_path.display(),
            error_msg
        ))
    } else if error_msg.contains("JSON") {
        CrossdiffError::invalid_input(format!(
            "Malformed JSON file '{}': {}",
            file_path.display(),
            error_msg
        ))
    } else if error_msg.contains("Permission denied") {
        CrossdiffError::invalid_input(format!(
            "Permission denied accessing file: {}",
            file_path.display()
        ))
    } else {
        CrossdiffError::DuckDb(error)
    }
}
