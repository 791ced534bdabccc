// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Single-row get, multi-get, and put.
//!
//! Reads treat any non-2xx answer as "no result": `get` returns `None` and
//! `get_many` an empty vector. Transport failures are still errors.

use tracing::{debug, instrument};

use hbase_rest_codec::{CellSet, Row};

use crate::client::{encode_segment, HBaseClient};
use crate::error::{HBaseError, Result};
use crate::transport::Method;

/// Optional refinements for [`HBaseClient::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Restrict to a family or `family:qualifier`.
    pub column: Option<Vec<u8>>,
    /// Read the row as of this timestamp (ms).
    pub timestamp: Option<i64>,
    /// Maximum number of versions per cell.
    pub versions: Option<u32>,
    /// Pair each value with its cell timestamp.
    pub include_timestamp: bool,
}

impl GetOptions {
    /// Restrict to a column or family.
    pub fn column(mut self, column: impl Into<Vec<u8>>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Read as of `timestamp`.
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Request up to `versions` versions.
    pub fn versions(mut self, versions: u32) -> Self {
        self.versions = Some(versions);
        self
    }

    /// Keep cell timestamps.
    pub fn include_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }
}

impl HBaseClient {
    /// Read one row.
    ///
    /// Returns `None` if the gateway does not answer 2xx or the answer holds
    /// no row.
    #[instrument(skip(self, key, options), fields(key_len = key.as_ref().len()))]
    pub async fn get(
        &self,
        table: &str,
        key: impl AsRef<[u8]>,
        options: &GetOptions,
    ) -> Result<Option<Row>> {
        let path = row_path(table, key.as_ref(), options);
        let Some(set) = self.get_json_opt::<CellSet>(&path).await? else {
            debug!("row not found");
            return Ok(None);
        };
        match set.rows.first() {
            Some(wire) => Ok(Some(Row::from_wire(wire, options.include_timestamp)?)),
            None => Ok(None),
        }
    }

    /// Read several rows in one request.
    ///
    /// An empty `keys` slice returns immediately without contacting the gateway.
    #[instrument(skip(self, keys), fields(keys = keys.len()))]
    pub async fn get_many<K: AsRef<[u8]>>(
        &self,
        table: &str,
        keys: &[K],
        include_timestamp: bool,
    ) -> Result<Vec<Row>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let query = keys
            .iter()
            .map(|k| format!("row={}", encode_segment(k)))
            .collect::<Vec<_>>()
            .join("&");
        let path = format!("/{}/multiget?{query}", encode_segment(table));

        let Some(set) = self.get_json_opt::<CellSet>(&path).await? else {
            return Ok(Vec::new());
        };
        set.rows
            .iter()
            .map(|wire| Row::from_wire(wire, include_timestamp).map_err(HBaseError::from))
            .collect()
    }

    /// Write rows. Every column of every row becomes one cell.
    ///
    /// An empty `rows` slice writes nothing and returns `false`.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn put(&self, table: &str, rows: &[Row]) -> Result<bool> {
        if rows.is_empty() {
            return Ok(false);
        }
        let set = CellSet {
            rows: rows.iter().map(Row::to_wire).collect(),
        };
        let body = serde_json::to_value(&set)?;
        // The gateway requires a row key in the path; the body's keys are authoritative.
        let path = format!("/{}/1", encode_segment(table));
        self.succeeded(Method::PUT, &path, Some(body)).await
    }
}

fn row_path(table: &str, key: &[u8], options: &GetOptions) -> String {
    let mut path = format!("/{}/{}", encode_segment(table), encode_segment(key));
    if let Some(column) = &options.column {
        path.push('/');
        path.push_str(&encode_segment(column));
    }
    if let Some(ts) = options.timestamp {
        path.push_str(&format!("/{ts}"));
    }
    if let Some(versions) = options.versions {
        path.push_str(&format!("?v={versions}"));
    }
    path
}
