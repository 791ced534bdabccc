// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! HBase REST client configuration and request plumbing.
//!
//! [`HBaseClient`] owns the base URL, configuration, and its own transport
//! handle. Gateway operations (cluster info, namespaces, tables, rows, scans)
//! are defined as `impl HBaseClient` blocks in their respective modules.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{HBaseError, Result};
use crate::transport::{GatewayRequest, GatewayResponse, Method, ReqwestTransport, Transport};

// ---------------------------------------------------------------------------
// HBaseClient
// ---------------------------------------------------------------------------

/// Client for one HBase REST gateway.
///
/// Cloning is cheap and shares the transport; separately constructed clients
/// never share connection state.
///
/// # Examples
///
/// ```rust,no_run
/// use hbase_rest_client::client::HBaseClient;
///
/// # #[tokio::main]
/// # async fn main() -> hbase_rest_client::error::Result<()> {
/// let client = HBaseClient::new("http://localhost:8080")?;
/// for table in client.tables().await? {
///     println!("{table}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HBaseClient {
    /// Gateway root; always ends in `/`.
    base_url: Url,
    /// Settings the client was built from.
    config: ClientConfig,
    /// HTTP round-trip implementation.
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HBaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HBaseClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HBaseClient {
    // -- Constructors -------------------------------------------------------

    /// Create a client with default settings pointing at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HBaseError::Validation`] if `base_url` cannot be parsed.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url))
    }

    /// Create a client backed by a fresh [`ReqwestTransport`].
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let base_url = normalize_base_url(&config.base_url)?;
        Ok(Self {
            base_url,
            config,
            transport,
        })
    }

    // -- Accessors ----------------------------------------------------------

    /// Gateway root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    // -- Internal HTTP helpers ----------------------------------------------

    /// Resolve a gateway path (leading `/` optional) against the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| HBaseError::Validation(format!("Invalid request path {path:?}: {e}")))
    }

    /// Send a request and return the raw response.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<GatewayResponse> {
        let mut request = GatewayRequest::new(method, self.url(path)?);
        if let Some(body) = body {
            request = request.with_body(body);
        }
        self.transport.execute(request).await
    }

    /// GET and decode a JSON body, failing on non-2xx.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, None).await?;
        if !response.is_success() {
            return Err(HBaseError::Server {
                status: response.status,
                message: response.message(),
            });
        }
        response.json()
    }

    /// GET and decode a JSON body, mapping non-2xx to `None`.
    pub(crate) async fn get_json_opt<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = self.send(Method::GET, path, None).await?;
        if !response.is_success() {
            return Ok(None);
        }
        response.json().map(Some)
    }

    /// Send a request and report whether the gateway answered 2xx.
    pub(crate) async fn succeeded(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<bool> {
        Ok(self.send(method, path, body).await?.is_success())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse the base URL, dropping query and fragment and ensuring the path ends
/// in `/` so relative joins keep any mount prefix.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| HBaseError::Validation(format!("Invalid base URL: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(HBaseError::Validation(format!(
            "Invalid base URL: {raw} cannot carry a path"
        )));
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Percent-encode raw bytes for use as one path segment or query value.
///
/// Unreserved characters pass through; everything else, including `/`, `:`
/// and non-UTF-8 bytes, becomes `%XX`.
pub(crate) fn encode_segment(input: impl AsRef<[u8]>) -> String {
    let input = input.as_ref();
    let mut output = String::with_capacity(input.len());
    for &byte in input {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                output.push(byte as char);
            }
            _ => {
                output.push('%');
                output.push_str(&format!("{byte:02X}"));
            }
        }
    }
    output
}
