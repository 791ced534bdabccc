// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! JSON wire models for the HBase REST gateway.
//!
//! Field names follow the gateway's JSON representation exactly (`Row`,
//! `Cell`, `$`, camelCase scanner attributes). All binary fields hold base64
//! text; decoding into bytes happens in [`crate::row`].

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

// ---------------------------------------------------------------------------
// Cell sets
// ---------------------------------------------------------------------------

/// A batch of rows, as returned by row gets, multi-gets and scanner fetches,
/// and as sent by puts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSet {
    /// Rows in key order. Absent on the wire means an empty batch.
    #[serde(rename = "Row", default)]
    pub rows: Vec<WireRow>,
}

impl CellSet {
    /// Parse a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, CodecError> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// One row fragment: a base64 key plus its cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRow {
    /// Base64 row key.
    pub key: String,
    /// Cells belonging to this fragment.
    #[serde(rename = "Cell", default)]
    pub cells: Vec<WireCell>,
}

/// A single (column, value, timestamp) triplet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCell {
    /// Base64 `family:qualifier` identifier.
    pub column: String,
    /// Base64 cell value.
    #[serde(rename = "$")]
    pub value: String,
    /// Cell timestamp in milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

// ---------------------------------------------------------------------------
// Scanner creation
// ---------------------------------------------------------------------------

/// Body of `PUT /{table}/scanner/`.
///
/// Optional attributes are omitted from the JSON entirely when unset, as is
/// an empty column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerModel {
    /// Maximum number of cells per fetch.
    pub batch: u32,
    /// Base64 inclusive start key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_row: Option<String>,
    /// Base64 exclusive end key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_row: Option<String>,
    /// Lower bound on cell timestamps (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Upper bound on cell timestamps (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// Base64 column or family identifiers to return.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column: Vec<String>,
    /// Server-side filter, itself a JSON document carried as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl ScannerModel {
    /// A model that scans the whole table `batch` cells at a time.
    pub fn with_batch(batch: u32) -> Self {
        Self {
            batch,
            start_row: None,
            end_row: None,
            start_time: None,
            end_time: None,
            column: Vec::new(),
            filter: None,
        }
    }
}
