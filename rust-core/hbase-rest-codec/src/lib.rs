// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! # HBase REST codec
//!
//! JSON wire models spoken by the HBase REST gateway and the conversions
//! between them and decoded, byte-oriented rows.
//!
//! Every binary field on the wire (row keys, column identifiers, cell values,
//! filter arguments) is base64-encoded. This crate owns that encoding so the
//! transport-facing client never touches raw base64 text.
//!
//! ## Modules
//!
//! - [`encoding`]: base64 encode/decode for individual wire fields.
//! - [`model`]: `CellSet`, `WireRow`, `WireCell`, and the scanner creation body.
//! - [`filter`]: server-side scan filters and their embedded JSON form.
//! - [`row`]: decoded [`Row`] and [`ColumnValue`] types.
//! - [`error`]: [`CodecError`].

pub mod encoding;
pub mod error;
pub mod filter;
pub mod model;
pub mod row;

pub use error::CodecError;
pub use filter::ScanFilter;
pub use model::{CellSet, ScannerModel, WireCell, WireRow};
pub use row::{ColumnValue, Row};
