// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! # HBase REST Client
//!
//! A Rust client for the HBase REST gateway: cluster information, namespace
//! and table administration, single-row and multi-row access, and cursor
//! scans that reassemble rows split across fetch batches.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use hbase_rest_client::client::HBaseClient;
//! use hbase_rest_client::scan::ScanRequest;
//!
//! #[tokio::main]
//! async fn main() -> hbase_rest_client::error::Result<()> {
//!     let client = HBaseClient::new("http://localhost:8080")?;
//!     let mut rows = Box::pin(client.scan(ScanRequest::new("test").prefix("1:")));
//!     while let Some(row) = rows.try_next().await? {
//!         println!("{} columns in {:?}", row.columns.len(), row.key);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`client`]: [`HBaseClient`] construction and request plumbing.
//! - [`config`]: [`ClientConfig`] and environment overrides.
//! - [`transport`]: the [`Transport`] seam and its reqwest implementation.
//! - [`cluster`]: gateway and cluster version/status.
//! - [`namespace`]: namespace administration.
//! - [`table`]: table listing, schemas, creation, deletion, regions.
//! - [`rows`]: get, multi-get, put.
//! - [`scan`]: cursor scans ([`ScanRequest`], [`Scanner`]).
//! - [`stitch`]: the cross-batch [`RowStitcher`].
//! - [`error`]: [`HBaseError`] and the crate-level `Result` alias.

pub mod client;
pub mod cluster;
pub mod config;
pub mod error;
pub mod namespace;
pub mod rows;
pub mod scan;
pub mod stitch;
pub mod table;
pub mod transport;

pub use client::HBaseClient;
pub use config::ClientConfig;
pub use error::{HBaseError, Result};
pub use hbase_rest_codec::{ColumnValue, Row};
pub use rows::GetOptions;
pub use scan::{ScanRequest, Scanner};
pub use stitch::RowStitcher;
pub use table::{ColumnSchema, TableSchema};
pub use transport::{GatewayRequest, GatewayResponse, Transport};
