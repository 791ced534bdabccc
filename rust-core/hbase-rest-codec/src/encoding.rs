// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Base64 field codec.
//!
//! The gateway uses the standard alphabet with padding for every binary field.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CodecError;

/// Encode raw bytes for a wire field.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Decode a wire field, naming the field in the error on failure.
pub fn decode(field: &'static str, text: &str) -> Result<Vec<u8>, CodecError> {
    STANDARD
        .decode(text)
        .map_err(|source| CodecError::Base64 { field, source })
}
