// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Errors raised while translating between wire JSON and decoded rows.

use thiserror::Error;

/// Failure to decode or encode a gateway payload.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A base64 field could not be decoded.
    #[error("invalid base64 in {field}: {source}")]
    Base64 {
        /// Which wire field was malformed (`key`, `column`, `$`, ...).
        field: &'static str,
        /// Underlying decoder error.
        #[source]
        source: base64::DecodeError,
    },

    /// The payload was not valid JSON for the expected model.
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}
