// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>
//!
//! Output formatters for gateway answers.
//!
//! Two output modes:
//! - **Table**: human-readable columnar output using `comfy-table`.
//! - **JSON**: pretty-printed JSON for pipeline consumption.
//!
//! Row keys, columns and values are bytes; they are shown as lossy UTF-8.

use std::fmt;

use clap::ValueEnum;
use comfy_table::{Cell, ContentArrangement, Table};
use hbase_rest_codec::Row;
use serde_json::{json, Map, Value};

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Format an arbitrary JSON answer (version, status, schema).
pub fn format_value(value: &Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(value),
        OutputFormat::Table => match value {
            Value::Object(obj) => format_object_table(obj),
            other => value_to_cell(other),
        },
    }
}

/// Format a list of names (tables, namespaces).
pub fn format_names(header: &str, names: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(&json!(names)),
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_header(vec![Cell::new(header)]);
            for name in names {
                table.add_row(vec![Cell::new(name)]);
            }
            format!("{table}\n{}", count_line(names.len(), header))
        }
    }
}

/// Format rows, one table line per cell.
pub fn format_rows(rows: &[Row], timestamps: bool, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(&Value::Array(rows.iter().map(row_to_json).collect())),
        OutputFormat::Table => {
            let mut table = new_table();
            let mut header = vec![Cell::new("row"), Cell::new("column"), Cell::new("value")];
            if timestamps {
                header.push(Cell::new("timestamp"));
            }
            table.set_header(header);

            for row in rows {
                let key = lossy(&row.key);
                for (column, cell) in &row.columns {
                    let mut line = vec![
                        Cell::new(&key),
                        Cell::new(lossy(column)),
                        Cell::new(lossy(&cell.value)),
                    ];
                    if timestamps {
                        let ts = cell.timestamp.map(|t| t.to_string()).unwrap_or_default();
                        line.push(Cell::new(ts));
                    }
                    table.add_row(line);
                }
            }
            format!("{table}\n{}", count_line(rows.len(), "row"))
        }
    }
}

/// `{"key": ..., "columns": {column: value | {"value", "timestamp"}}}`
fn row_to_json(row: &Row) -> Value {
    let columns: Map<String, Value> = row
        .columns
        .iter()
        .map(|(column, cell)| {
            let value = match cell.timestamp {
                Some(ts) => json!({ "value": lossy(&cell.value), "timestamp": ts }),
                None => Value::String(lossy(&cell.value)),
            };
            (lossy(column), value)
        })
        .collect();
    json!({ "key": lossy(&row.key), "columns": columns })
}

fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn count_line(count: usize, noun: &str) -> String {
    format!("({count} {noun}{})", if count == 1 { "" } else { "s" })
}

/// Render a single JSON object as a two-column table (Field | Value).
fn format_object_table(obj: &Map<String, Value>) -> String {
    let mut table = new_table();
    table.set_header(vec![Cell::new("Field"), Cell::new("Value")]);
    for (key, val) in obj {
        table.add_row(vec![Cell::new(key), Cell::new(value_to_cell(val))]);
    }
    table.to_string()
}

/// Shorten nested values so one cell stays readable.
fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) if arr.len() > 3 => format!("[{} items]", arr.len()),
        Value::Object(obj) if obj.len() > 3 => format!("{{{} fields}}", obj.len()),
        other => other.to_string(),
    }
}
