// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Gateway transport.
//!
//! The client speaks to the gateway through the [`Transport`] trait: one
//! request in, one response out, no retries. [`ReqwestTransport`] is the
//! production implementation; tests substitute scripted transports.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LOCATION};
pub use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{HBaseError, Result};

/// An outgoing gateway request.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// JSON body, sent with `Content-Type: application/json` when present.
    pub body: Option<serde_json::Value>,
}

impl GatewayRequest {
    /// A request without a body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
        }
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The parts of a gateway response the client inspects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Location` header, if any.
    pub location: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl GatewayResponse {
    /// A response with the given status and no headers or body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 204, which a scanner fetch uses to signal exhaustion.
    pub fn is_no_content(&self) -> bool {
        self.status == 204
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(HBaseError::Serialization)
    }

    /// Body as text for error messages.
    pub fn message(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        let text = text.trim();
        if text.is_empty() {
            format!("HTTP {}", self.status)
        } else {
            text.to_string()
        }
    }
}

/// A synchronous-per-call HTTP round trip to the gateway.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return its response, whatever the status.
    ///
    /// Only failures to obtain a response are errors.
    async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse>;
}

// ---------------------------------------------------------------------------
// ReqwestTransport
// ---------------------------------------------------------------------------

/// [`Transport`] over a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout_ms: u64,
}

impl ReqwestTransport {
    /// Build the underlying HTTP client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HBaseError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(HBaseError::transport)?;

        Ok(Self {
            http,
            timeout_ms: config.timeout_ms,
        })
    }

    fn map_error(&self, err: reqwest::Error) -> HBaseError {
        if err.is_timeout() {
            HBaseError::Timeout(self.timeout_ms)
        } else {
            HBaseError::transport(err)
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        debug!(method = %request.method, url = %request.url, "gateway request");

        let mut builder = self.http.request(request.method, request.url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(e))?
            .to_vec();

        debug!(status, bytes = body.len(), "gateway response");
        Ok(GatewayResponse {
            status,
            location,
            body,
        })
    }
}
