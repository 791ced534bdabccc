// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Namespace administration.
//!
//! Mutating calls report the gateway's verdict as a `bool` (2xx or not);
//! only transport failures are errors.

use serde::Deserialize;
use tracing::instrument;

use crate::client::{encode_segment, HBaseClient};
use crate::error::Result;
use crate::table::TableList;
use crate::transport::Method;

/// Body of `GET /namespaces`.
#[derive(Debug, Deserialize)]
struct NamespaceList {
    #[serde(rename = "Namespace", default)]
    namespaces: Vec<String>,
}

impl HBaseClient {
    /// Names of every namespace.
    #[instrument(skip(self))]
    pub async fn namespaces(&self) -> Result<Vec<String>> {
        let list: NamespaceList = self.get_json("/namespaces").await?;
        Ok(list.namespaces)
    }

    /// Namespace properties, or `None` if the gateway does not answer 2xx.
    #[instrument(skip(self))]
    pub async fn namespace(&self, ns: &str) -> Result<Option<serde_json::Value>> {
        self.get_json_opt(&namespace_path(ns)).await
    }

    /// Create a namespace.
    #[instrument(skip(self))]
    pub async fn namespace_create(&self, ns: &str) -> Result<bool> {
        self.succeeded(Method::POST, &namespace_path(ns), None).await
    }

    /// Alter a namespace.
    #[instrument(skip(self))]
    pub async fn namespace_alter(&self, ns: &str) -> Result<bool> {
        self.succeeded(Method::PUT, &namespace_path(ns), None).await
    }

    /// Delete a namespace. The gateway refuses non-empty namespaces.
    #[instrument(skip(self))]
    pub async fn namespace_delete(&self, ns: &str) -> Result<bool> {
        self.succeeded(Method::DELETE, &namespace_path(ns), None).await
    }

    /// Tables inside `ns`; empty if the namespace cannot be read.
    #[instrument(skip(self))]
    pub async fn namespace_tables(&self, ns: &str) -> Result<Vec<String>> {
        let path = format!("{}/tables", namespace_path(ns));
        let list: Option<TableList> = self.get_json_opt(&path).await?;
        Ok(list.map(TableList::into_names).unwrap_or_default())
    }
}

fn namespace_path(ns: &str) -> String {
    format!("/namespaces/{}", encode_segment(ns))
}
