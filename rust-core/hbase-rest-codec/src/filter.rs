// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Server-side scan filters.
//!
//! The gateway expects the filter as a JSON document serialized into a string
//! field of the scanner body, so [`ScanFilter::to_json_string`] produces text,
//! not a nested object.

use serde::Serialize;

use crate::encoding;

/// A filter evaluated by the region servers during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ScanFilter {
    /// Keep only rows whose key starts with `value` (base64).
    #[serde(rename = "PrefixFilter")]
    Prefix {
        /// Base64 key prefix.
        value: String,
    },
}

impl ScanFilter {
    /// Prefix filter over raw key bytes.
    pub fn prefix(prefix: impl AsRef<[u8]>) -> Self {
        ScanFilter::Prefix {
            value: encoding::encode(prefix),
        }
    }

    /// The embedded JSON text placed in the scanner body's `filter` field.
    pub fn to_json_string(&self) -> String {
        // Serializing a tagged enum of owned strings cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
