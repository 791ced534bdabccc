// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Gateway and cluster information endpoints.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::HBaseClient;
use crate::error::Result;

/// Software versions reported by `GET /version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// REST gateway version.
    #[serde(rename = "REST", default)]
    pub rest: Option<String>,
    /// JVM vendor and version.
    #[serde(rename = "JVM", default)]
    pub jvm: Option<String>,
    /// Operating system description.
    #[serde(rename = "OS", default)]
    pub os: Option<String>,
    /// Embedded HTTP server.
    #[serde(rename = "Server", default)]
    pub server: Option<String>,
    /// Jersey version.
    #[serde(rename = "Jersey", default)]
    pub jersey: Option<String>,
}

impl HBaseClient {
    /// Versions of the gateway process itself.
    #[instrument(skip(self))]
    pub async fn version(&self) -> Result<VersionInfo> {
        self.get_json("/version").await
    }

    /// Version of the storage cluster behind the gateway.
    #[instrument(skip(self))]
    pub async fn cluster_version(&self) -> Result<serde_json::Value> {
        self.get_json("/version/cluster").await
    }

    /// Cluster status: live and dead servers, regions, load.
    #[instrument(skip(self))]
    pub async fn cluster_status(&self) -> Result<serde_json::Value> {
        self.get_json("/status/cluster").await
    }
}
