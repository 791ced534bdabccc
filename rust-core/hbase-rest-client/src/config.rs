// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Client configuration.
//!
//! [`ClientConfig`] can be built in code, deserialized from any serde format,
//! or read from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `HBASE_REST_URL` | `base_url` |
//! | `HBASE_REST_TIMEOUT_MS` | `timeout_ms` |
//! | `HBASE_REST_BATCH_SIZE` | `default_batch_size` |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HBaseError, Result};

/// Environment variable holding the gateway base URL.
pub const ENV_URL: &str = "HBASE_REST_URL";
/// Environment variable holding the per-request timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "HBASE_REST_TIMEOUT_MS";
/// Environment variable holding the default scan batch size.
pub const ENV_BATCH_SIZE: &str = "HBASE_REST_BATCH_SIZE";

/// Cells per scanner fetch when neither the request nor the config says otherwise.
pub const DEFAULT_BATCH_SIZE: u32 = 1000;

/// Connection settings for one [`crate::client::HBaseClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Gateway base URL, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Batch size used by scans that do not set one.
    pub default_batch_size: u32,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 30_000,
            default_batch_size: DEFAULT_BATCH_SIZE,
            user_agent: concat!("hbase-rest-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults pointed at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read overrides from the process environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HBaseError::Validation`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`], with a caller-supplied variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = parse_number(ENV_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_BATCH_SIZE) {
            config.default_batch_size = parse_number(ENV_BATCH_SIZE, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that the transport and scanner rely on.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(HBaseError::Validation("timeout_ms must be positive".into()));
        }
        if self.default_batch_size == 0 {
            return Err(HBaseError::Validation(
                "default_batch_size must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| HBaseError::Validation(format!("{name} is not a valid number: {raw:?}")))
}
