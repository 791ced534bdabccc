// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Table administration: listing, schemas, creation, deletion, regions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::{encode_segment, HBaseClient};
use crate::error::{HBaseError, Result};
use crate::transport::Method;

// ---------------------------------------------------------------------------
// Schema types
// ---------------------------------------------------------------------------

/// One column family definition.
///
/// The gateway accepts and reports family attributes (`VERSIONS`,
/// `BLOOMFILTER`, `TTL`, ...) as loosely typed JSON; they are passed through
/// unchanged in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Family name.
    pub name: String,
    /// Remaining attributes.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl ColumnSchema {
    /// A family with no explicit attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A table schema as read from or written to `/{table}/schema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Column families.
    #[serde(rename = "ColumnSchema", default)]
    pub column_families: Vec<ColumnSchema>,
    /// Table-level attributes (`IS_META`, ...).
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

/// Body of `GET /` and `GET /namespaces/{ns}/tables`.
#[derive(Debug, Deserialize)]
pub(crate) struct TableList {
    #[serde(rename = "table", default)]
    tables: Vec<TableName>,
}

#[derive(Debug, Deserialize)]
struct TableName {
    name: String,
}

impl TableList {
    pub(crate) fn into_names(self) -> Vec<String> {
        self.tables.into_iter().map(|t| t.name).collect()
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl HBaseClient {
    /// Names of every table visible to the gateway.
    #[instrument(skip(self))]
    pub async fn tables(&self) -> Result<Vec<String>> {
        let list: TableList = self.get_json("/").await?;
        Ok(list.into_names())
    }

    /// The table's schema, or `None` if the gateway does not answer 2xx.
    #[instrument(skip(self))]
    pub async fn table_schema(&self, table: &str) -> Result<Option<TableSchema>> {
        self.get_json_opt(&schema_path(table)).await
    }

    /// Create `table` with the given families.
    ///
    /// # Errors
    ///
    /// Returns [`HBaseError::Validation`] without contacting the gateway if
    /// `families` is empty.
    #[instrument(skip(self, families))]
    pub async fn table_create(&self, table: &str, families: &[ColumnSchema]) -> Result<bool> {
        let body = schema_body(table, families)?;
        self.succeeded(Method::POST, &schema_path(table), Some(body)).await
    }

    /// Replace the family definitions of an existing table.
    ///
    /// # Errors
    ///
    /// Returns [`HBaseError::Validation`] if `families` is empty.
    #[instrument(skip(self, families))]
    pub async fn table_update(&self, table: &str, families: &[ColumnSchema]) -> Result<bool> {
        let body = schema_body(table, families)?;
        self.succeeded(Method::PUT, &schema_path(table), Some(body)).await
    }

    /// Drop a table.
    #[instrument(skip(self))]
    pub async fn table_delete(&self, table: &str) -> Result<bool> {
        self.succeeded(Method::DELETE, &schema_path(table), None).await
    }

    /// Region layout of a table.
    #[instrument(skip(self))]
    pub async fn table_regions(&self, table: &str) -> Result<serde_json::Value> {
        let path = format!("/{}/regions", encode_segment(table));
        self.get_json(&path).await
    }
}

fn schema_path(table: &str) -> String {
    format!("/{}/schema", encode_segment(table))
}

fn schema_body(table: &str, families: &[ColumnSchema]) -> Result<serde_json::Value> {
    if table.is_empty() {
        return Err(HBaseError::Validation("table name must not be empty".into()));
    }
    if families.is_empty() {
        return Err(HBaseError::Validation(
            "Need at least one column family".into(),
        ));
    }
    let schema = TableSchema {
        name: table.to_string(),
        column_families: families.to_vec(),
        attributes: BTreeMap::new(),
    };
    Ok(serde_json::to_value(schema)?)
}
