// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Decoded rows.
//!
//! A [`Row`] is a key plus an ordered map from column identifier to
//! [`ColumnValue`]. Keys, identifiers and values are raw bytes; nothing here
//! assumes UTF-8.

use std::collections::BTreeMap;

use crate::encoding;
use crate::error::CodecError;
use crate::model::{WireCell, WireRow};

/// A cell value, optionally paired with the timestamp of the cell it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnValue {
    /// Raw value bytes.
    pub value: Vec<u8>,
    /// Milliseconds since the epoch, when requested or supplied.
    pub timestamp: Option<i64>,
}

impl ColumnValue {
    /// A value without a timestamp.
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
            timestamp: None,
        }
    }

    /// A value carrying an explicit timestamp.
    pub fn with_timestamp(value: impl Into<Vec<u8>>, timestamp: i64) -> Self {
        Self {
            value: value.into(),
            timestamp: Some(timestamp),
        }
    }
}

/// A decoded row (or row fragment, while a scan is still stitching).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Row key bytes.
    pub key: Vec<u8>,
    /// Column identifier (`family:qualifier`) to value.
    pub columns: BTreeMap<Vec<u8>, ColumnValue>,
}

impl Row {
    /// An empty row with the given key.
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            columns: BTreeMap::new(),
        }
    }

    /// Builder-style column insertion.
    pub fn with_column(mut self, column: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        self.columns.insert(column.into(), ColumnValue::new(value));
        self
    }

    /// Look up a column's value bytes.
    pub fn value(&self, column: impl AsRef<[u8]>) -> Option<&[u8]> {
        self.columns.get(column.as_ref()).map(|c| c.value.as_slice())
    }

    /// Decode a wire row.
    ///
    /// When `include_timestamp` is false every [`ColumnValue::timestamp`] is
    /// `None`, even if the gateway sent one. A column repeated within the
    /// fragment keeps its last cell.
    pub fn from_wire(wire: &WireRow, include_timestamp: bool) -> Result<Self, CodecError> {
        let key = encoding::decode("key", &wire.key)?;
        let mut columns = BTreeMap::new();
        for cell in &wire.cells {
            let column = encoding::decode("column", &cell.column)?;
            let value = encoding::decode("$", &cell.value)?;
            let timestamp = if include_timestamp { cell.timestamp } else { None };
            columns.insert(column, ColumnValue { value, timestamp });
        }
        Ok(Self { key, columns })
    }

    /// Encode for a put body. Timestamps are sent only when present.
    pub fn to_wire(&self) -> WireRow {
        WireRow {
            key: encoding::encode(&self.key),
            cells: self
                .columns
                .iter()
                .map(|(column, cell)| WireCell {
                    column: encoding::encode(column),
                    value: encoding::encode(&cell.value),
                    timestamp: cell.timestamp,
                })
                .collect(),
        }
    }

    /// Fold an earlier fragment of the same row into this one.
    ///
    /// The earlier fragment's values win on conflicting column identifiers.
    pub fn absorb(&mut self, earlier: Row) {
        debug_assert_eq!(self.key, earlier.key);
        self.columns.extend(earlier.columns);
    }
}
