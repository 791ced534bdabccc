// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Error types for the HBase REST client.
//!
//! All fallible operations in this crate return [`Result<T>`], an alias for
//! `std::result::Result<T, HBaseError>`. A missing row or namespace is not an
//! error: lookups return `Option` or an empty collection instead.

use thiserror::Error;

use hbase_rest_codec::CodecError;

/// Error type for gateway operations.
#[derive(Error, Debug)]
pub enum HBaseError {
    /// The request never produced a response (connection refused, reset, DNS).
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request exceeded the configured timeout.
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// The gateway refused to open a scanner.
    #[error("Error creating scanner ({status}): {message}")]
    ScannerCreation {
        /// HTTP status code of the creation response.
        status: u16,
        /// Response body, or a placeholder when empty.
        message: String,
    },

    /// A scanner fetch returned a status other than 2xx or 204.
    #[error("Scanner fetch failed ({status}): {message}")]
    ScanFetch {
        /// HTTP status code of the fetch response.
        status: u16,
        /// Response body, or a placeholder when empty.
        message: String,
    },

    /// The gateway returned an error status for a request that requires success.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder when empty.
        message: String,
    },

    /// Arguments were rejected before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A successful response was missing something the protocol requires.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A wire field could not be decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// A JSON body could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HBaseError {
    /// Wrap any transport-level failure.
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        HBaseError::Transport(err.into())
    }
}

/// Crate-level result alias using [`HBaseError`].
pub type Result<T> = std::result::Result<T, HBaseError>;
