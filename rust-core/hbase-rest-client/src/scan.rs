// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Cursor scans.
//!
//! A scan opens a server-side cursor (`PUT /{table}/scanner/`), fetches
//! batches from the cursor URL until the gateway answers `204 No Content`,
//! and deletes the cursor. Rows split across batches are reassembled by
//! [`RowStitcher`] before they reach the caller.
//!
//! The cursor is released exactly once, whichever way the scan ends:
//!
//! | Ending | Release |
//! |--------|---------|
//! | exhausted | awaited inside [`Scanner::next_row`] before it returns `None` |
//! | fetch or decode error | awaited before the error is returned |
//! | [`Scanner::close`] | awaited |
//! | dropped early | spawned on the current tokio runtime from `Drop` |
//!
//! Release from `Drop` is best effort: the spawned DELETE needs the runtime
//! to keep running until it completes. A program that returns right after
//! abandoning a scan should end it with [`Scanner::close`] instead.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::stream::{self, Stream, TryStreamExt};
use tracing::{debug, instrument, warn};
use url::Url;

use hbase_rest_codec::{encoding, CellSet, Row, ScanFilter, ScannerModel};

use crate::client::{encode_segment, HBaseClient};
use crate::error::{HBaseError, Result};
use crate::stitch::RowStitcher;
use crate::transport::{GatewayRequest, Method, Transport};

// ---------------------------------------------------------------------------
// ScanRequest
// ---------------------------------------------------------------------------

/// What to scan. Built with chained setters and validated when the scanner
/// is opened.
///
/// `prefix` and `start_row` are independent options that may not be combined:
/// a prefix already fixes the start row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRequest {
    /// Table to scan.
    pub table: String,
    /// Only rows whose key starts with these bytes.
    pub prefix: Option<Vec<u8>>,
    /// Inclusive start key.
    pub start_row: Option<Vec<u8>>,
    /// Exclusive end key.
    pub end_row: Option<Vec<u8>>,
    /// Lower bound on cell timestamps (ms).
    pub start_time: Option<i64>,
    /// Upper bound on cell timestamps (ms).
    pub end_time: Option<i64>,
    /// Families or `family:qualifier` columns to return; empty means all.
    pub columns: Vec<Vec<u8>>,
    /// Cells per fetch; the client's configured default when unset.
    pub batch_size: Option<u32>,
    /// Pair each value with its cell timestamp.
    pub include_timestamp: bool,
}

impl ScanRequest {
    /// Scan all of `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Restrict to keys beginning with `prefix`. An empty prefix restricts nothing.
    pub fn prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Start at `key` (inclusive).
    pub fn start_row(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.start_row = Some(key.into());
        self
    }

    /// Stop before `key`.
    pub fn end_row(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.end_row = Some(key.into());
        self
    }

    /// Lower timestamp bound.
    pub fn start_time(mut self, millis: i64) -> Self {
        self.start_time = Some(millis);
        self
    }

    /// Upper timestamp bound.
    pub fn end_time(mut self, millis: i64) -> Self {
        self.end_time = Some(millis);
        self
    }

    /// Both timestamp bounds.
    pub fn time_range(self, start: i64, end: i64) -> Self {
        self.start_time(start).end_time(end)
    }

    /// Add one family or column to the allowlist.
    pub fn column(mut self, column: impl Into<Vec<u8>>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Add several families or columns to the allowlist.
    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Cells per fetch.
    pub fn batch_size(mut self, cells: u32) -> Self {
        self.batch_size = Some(cells);
        self
    }

    /// Keep cell timestamps.
    pub fn include_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    /// Reject requests the gateway would misinterpret.
    pub fn validate(&self) -> Result<()> {
        if self.table.is_empty() {
            return Err(HBaseError::Validation("table name must not be empty".into()));
        }
        if self.batch_size == Some(0) {
            return Err(HBaseError::Validation("batch size must be positive".into()));
        }
        if self.effective_prefix().is_some() && self.start_row.is_some() {
            return Err(HBaseError::Validation(
                "prefix and start_row are mutually exclusive".into(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start > end {
                return Err(HBaseError::Validation(format!(
                    "start_time {start} is after end_time {end}"
                )));
            }
        }
        Ok(())
    }

    fn effective_prefix(&self) -> Option<&[u8]> {
        self.prefix.as_deref().filter(|p| !p.is_empty())
    }

    /// The scanner creation body, using `default_batch` when no batch size is set.
    pub fn to_model(&self, default_batch: u32) -> Result<ScannerModel> {
        self.validate()?;

        let mut model = ScannerModel::with_batch(self.batch_size.unwrap_or(default_batch));
        if let Some(prefix) = self.effective_prefix() {
            model.start_row = Some(encoding::encode(prefix));
            model.filter = Some(ScanFilter::prefix(prefix).to_json_string());
        }
        if let Some(start) = &self.start_row {
            model.start_row = Some(encoding::encode(start));
        }
        model.end_row = self.end_row.as_ref().map(encoding::encode);
        model.start_time = self.start_time;
        model.end_time = self.end_time;
        model.column = self.columns.iter().map(encoding::encode).collect();
        Ok(model)
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// An open server-side cursor and the rows fetched from it.
///
/// Not resumable: the cursor belongs to this value alone and is released
/// when the scan ends or the value is dropped.
pub struct Scanner {
    transport: Arc<dyn Transport>,
    /// `None` once released.
    cursor: Option<Url>,
    include_timestamp: bool,
    stitcher: RowStitcher,
    ready: VecDeque<Row>,
    batches: u64,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("cursor", &self.cursor.as_ref().map(Url::as_str))
            .field("ready", &self.ready.len())
            .field("batches", &self.batches)
            .finish_non_exhaustive()
    }
}

impl Scanner {
    fn new(transport: Arc<dyn Transport>, cursor: Url, include_timestamp: bool) -> Self {
        Self {
            transport,
            cursor: Some(cursor),
            include_timestamp,
            stitcher: RowStitcher::new(),
            ready: VecDeque::new(),
            batches: 0,
        }
    }

    /// URL of the server-side cursor while it is still held.
    pub fn cursor(&self) -> Option<&Url> {
        self.cursor.as_ref()
    }

    /// Number of non-empty fetch responses received so far.
    pub fn batches_fetched(&self) -> u64 {
        self.batches
    }

    /// Next complete row, fetching as many batches as needed.
    ///
    /// Returns `Ok(None)` once the cursor is exhausted; the cursor has then
    /// already been released. After an error the scanner is finished.
    pub async fn next_row(&mut self) -> Result<Option<Row>> {
        loop {
            if let Some(row) = self.ready.pop_front() {
                return Ok(Some(row));
            }
            let Some(cursor) = self.cursor.clone() else {
                return Ok(None);
            };

            match self.fetch_batch(&cursor).await {
                Ok(Some(rows)) => {
                    let complete = self.stitcher.push_batch(rows);
                    self.ready.extend(complete);
                }
                Ok(None) => {
                    self.ready.extend(self.stitcher.finish());
                    self.release().await;
                }
                Err(err) => {
                    self.stitcher = RowStitcher::new();
                    self.release().await;
                    return Err(err);
                }
            }
        }
    }

    /// Stop scanning and release the cursor now.
    pub async fn close(mut self) {
        self.release().await;
    }

    /// Turn the scanner into a stream of rows.
    ///
    /// Dropping the stream early drops the scanner, which releases the cursor.
    pub fn into_stream(self) -> impl Stream<Item = Result<Row>> + Send + 'static {
        stream::try_unfold(self, |mut scanner| async move {
            Ok::<_, HBaseError>(scanner.next_row().await?.map(|row| (row, scanner)))
        })
    }

    /// One fetch. `None` means the cursor is exhausted.
    async fn fetch_batch(&mut self, cursor: &Url) -> Result<Option<Vec<Row>>> {
        let response = self
            .transport
            .execute(GatewayRequest::new(Method::GET, cursor.clone()))
            .await?;

        if response.is_no_content() {
            debug!(cursor = %cursor, batches = self.batches, "scanner exhausted");
            return Ok(None);
        }
        if !response.is_success() {
            return Err(HBaseError::ScanFetch {
                status: response.status,
                message: response.message(),
            });
        }

        let set = if response.body.iter().all(u8::is_ascii_whitespace) {
            CellSet::default()
        } else {
            CellSet::from_slice(&response.body)?
        };
        let rows = set
            .rows
            .iter()
            .map(|wire| Row::from_wire(wire, self.include_timestamp))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        self.batches += 1;
        debug!(batch = self.batches, rows = rows.len(), "scanner batch");
        Ok(Some(rows))
    }

    /// Delete the cursor if still held. Best effort; the outcome is only logged.
    ///
    /// The DELETE runs as its own task, so cancelling the caller while it is
    /// in flight does not cancel the request.
    async fn release(&mut self) {
        let Some(cursor) = self.cursor.take() else {
            return;
        };
        let release = release_cursor(Arc::clone(&self.transport), cursor);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                if let Err(err) = handle.spawn(release).await {
                    warn!(error = %err, "scanner release task did not complete");
                }
            }
            Err(_) => release.await,
        }
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        let Some(cursor) = self.cursor.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!(cursor = %cursor, "scanner dropped early; releasing cursor");
                handle.spawn(release_cursor(Arc::clone(&self.transport), cursor));
            }
            Err(_) => {
                warn!(cursor = %cursor, "scanner dropped outside a tokio runtime; cursor leaked");
            }
        }
    }
}

async fn release_cursor(transport: Arc<dyn Transport>, cursor: Url) {
    let request = GatewayRequest::new(Method::DELETE, cursor.clone());
    match transport.execute(request).await {
        Ok(response) if response.is_success() => {
            debug!(cursor = %cursor, "scanner released");
        }
        Ok(response) => {
            warn!(cursor = %cursor, status = response.status, "scanner release rejected");
        }
        Err(err) => {
            warn!(cursor = %cursor, error = %err, "scanner release failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Client operations
// ---------------------------------------------------------------------------

impl HBaseClient {
    /// Open a cursor for `request`.
    ///
    /// # Errors
    ///
    /// - [`HBaseError::Validation`] if the request is malformed (no request sent);
    /// - [`HBaseError::ScannerCreation`] if the gateway does not answer 2xx;
    /// - [`HBaseError::InvalidResponse`] if the answer has no usable `Location`.
    #[instrument(skip(self, request), fields(table = %request.table))]
    pub async fn open_scanner(&self, request: &ScanRequest) -> Result<Scanner> {
        let model = request.to_model(self.config().default_batch_size)?;
        let path = format!("/{}/scanner/", encode_segment(&request.table));

        let response = self
            .send(Method::PUT, &path, Some(serde_json::to_value(&model)?))
            .await?;
        if !response.is_success() {
            return Err(HBaseError::ScannerCreation {
                status: response.status,
                message: response.message(),
            });
        }

        let location = response.location.as_deref().ok_or_else(|| {
            HBaseError::InvalidResponse("scanner created without a Location header".into())
        })?;
        let cursor = self.base_url().join(location).map_err(|e| {
            HBaseError::InvalidResponse(format!("bad scanner Location {location:?}: {e}"))
        })?;

        debug!(cursor = %cursor, batch = model.batch, "scanner opened");
        Ok(Scanner::new(self.transport(), cursor, request.include_timestamp))
    }

    /// Lazily scan `request` as a stream of complete rows.
    ///
    /// Nothing is sent until the stream is first polled. A creation failure
    /// is the stream's first and only item. Dropping the stream before it
    /// ends releases the cursor from `Drop`; use [`HBaseClient::open_scanner`]
    /// and [`Scanner::close`] when the runtime may stop right afterwards.
    pub fn scan(&self, request: ScanRequest) -> impl Stream<Item = Result<Row>> + Send + '_ {
        stream::once(async move { self.open_scanner(&request).await })
            .map_ok(Scanner::into_stream)
            .try_flatten()
    }

    /// Scan to exhaustion and collect every row.
    pub async fn scan_all(&self, request: &ScanRequest) -> Result<Vec<Row>> {
        let mut scanner = self.open_scanner(request).await?;
        let mut rows = Vec::new();
        while let Some(row) = scanner.next_row().await? {
            rows.push(row);
        }
        Ok(rows)
    }
}
