// SPDX-License-Identifier: PMPL-1.0-or-later
//! In-memory gateways shared by the integration tests.
//!
//! - [`FakeGateway`] emulates the REST gateway over an in-memory table store,
//!   paging scanner results by cell count like the real server.
//! - [`ScriptedGateway`] replays a fixed sequence of scanner fetch responses.
//!
//! Both record every request so tests can assert on exact traffic.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hbase_rest_client::transport::{GatewayRequest, GatewayResponse, Method, Transport};
use hbase_rest_client::{ClientConfig, HBaseClient, HBaseError, Result};
use hbase_rest_codec::{encoding, CellSet, ScannerModel, WireCell, WireRow};
use serde_json::json;

pub const BASE_URL: &str = "http://gateway:8080";

/// A request as seen by a gateway: method plus path-and-query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub method: Method,
    pub target: String,
    pub body: Option<serde_json::Value>,
}

fn target(request: &GatewayRequest) -> String {
    match request.url.query() {
        Some(q) => format!("{}?{q}", request.url.path()),
        None => request.url.path().to_string(),
    }
}

fn percent_decode(segment: &str) -> Vec<u8> {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap();
            out.push(u8::from_str_radix(hex, 16).unwrap());
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    out
}

fn json_response(status: u16, body: serde_json::Value) -> GatewayResponse {
    GatewayResponse {
        status,
        location: None,
        body: serde_json::to_vec(&body).unwrap(),
    }
}

pub fn client_for(transport: Arc<dyn Transport>) -> HBaseClient {
    HBaseClient::with_transport(ClientConfig::new(BASE_URL), transport).unwrap()
}

// ---------------------------------------------------------------------------
// FakeGateway
// ---------------------------------------------------------------------------

type Cells = BTreeMap<Vec<u8>, (Vec<u8>, i64)>;

#[derive(Debug, Default)]
struct FakeTable {
    schema: serde_json::Value,
    rows: BTreeMap<Vec<u8>, Cells>,
}

#[derive(Debug)]
struct OpenScanner {
    cells: VecDeque<(Vec<u8>, Vec<u8>, Vec<u8>, i64)>,
    batch: usize,
}

#[derive(Debug, Default)]
struct FakeState {
    namespaces: BTreeMap<String, Vec<String>>,
    tables: BTreeMap<String, FakeTable>,
    scanners: HashMap<String, OpenScanner>,
    next_scanner: u64,
    clock: i64,
    seen: Vec<Seen>,
}

/// A stateful stand-in for the REST gateway.
#[derive(Debug, Default)]
pub struct FakeGateway {
    state: Mutex<FakeState>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        let gateway = Self::default();
        {
            let mut state = gateway.state.lock().unwrap();
            state.namespaces.insert("default".into(), Vec::new());
            state.namespaces.insert("hbase".into(), vec!["meta".into()]);
            state.clock = 1_700_000_000_000;
        }
        Arc::new(gateway)
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.lock().unwrap().seen.clone()
    }

    pub fn count(&self, method: Method, fragment: &str) -> usize {
        self.seen()
            .iter()
            .filter(|s| s.method == method && s.target.contains(fragment))
            .count()
    }

    pub fn open_scanners(&self) -> usize {
        self.state.lock().unwrap().scanners.len()
    }

    fn handle(&self, request: &GatewayRequest) -> GatewayResponse {
        let mut state = self.state.lock().unwrap();
        state.seen.push(Seen {
            method: request.method.clone(),
            target: target(request),
            body: request.body.clone(),
        });

        let segments: Vec<Vec<u8>> = request
            .url
            .path_segments()
            .map(|s| s.map(percent_decode).collect())
            .unwrap_or_default();
        let text: Vec<String> = segments
            .iter()
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .collect();
        let parts: Vec<&str> = text.iter().map(String::as_str).collect();

        match (request.method.clone(), parts.as_slice()) {
            (Method::GET, [""]) => {
                let tables: Vec<_> = state.tables.keys().map(|n| json!({ "name": n })).collect();
                json_response(200, json!({ "table": tables }))
            }
            (Method::GET, ["version"]) => json_response(
                200,
                json!({"REST": "0.0.3", "JVM": "Test JVM", "OS": "Linux", "Server": "jetty", "Jersey": "2"}),
            ),
            (Method::GET, ["version", "cluster"]) => json_response(200, json!("2.5.8")),
            (Method::GET, ["status", "cluster"]) => {
                json_response(200, json!({"regions": state.tables.len(), "LiveNodes": []}))
            }
            (Method::GET, ["namespaces"]) => {
                let names: Vec<_> = state.namespaces.keys().cloned().collect();
                json_response(200, json!({ "Namespace": names }))
            }
            (method, ["namespaces", ns]) => {
                let exists = state.namespaces.contains_key(*ns);
                match method {
                    Method::GET if exists => json_response(200, json!({})),
                    Method::POST if !exists => {
                        state.namespaces.insert(ns.to_string(), Vec::new());
                        GatewayResponse::status(201)
                    }
                    Method::PUT if exists => GatewayResponse::status(200),
                    Method::DELETE if exists => {
                        state.namespaces.remove(*ns);
                        GatewayResponse::status(200)
                    }
                    _ => GatewayResponse::status(404),
                }
            }
            (Method::GET, ["namespaces", ns, "tables"]) => match state.namespaces.get(*ns) {
                Some(tables) => {
                    let tables: Vec<_> = tables.iter().map(|n| json!({ "name": n })).collect();
                    json_response(200, json!({ "table": tables }))
                }
                None => GatewayResponse::status(404),
            },
            (method, [table, "schema"]) => {
                let table = table.to_string();
                match method {
                    Method::GET => match state.tables.get(&table) {
                        Some(t) => json_response(200, t.schema.clone()),
                        None => GatewayResponse::status(404),
                    },
                    Method::POST | Method::PUT => {
                        let schema = request.body.clone().unwrap_or_default();
                        state.tables.entry(table).or_default().schema = schema;
                        GatewayResponse::status(201)
                    }
                    Method::DELETE => match state.tables.remove(&table) {
                        Some(_) => GatewayResponse::status(200),
                        None => GatewayResponse::status(404),
                    },
                    _ => GatewayResponse::status(405),
                }
            }
            (Method::GET, [table, "regions"]) if state.tables.contains_key(*table) => {
                json_response(200, json!({ "name": table, "Region": [{ "id": 1, "location": "rs1:16020" }] }))
            }
            (Method::PUT, [table, "scanner", ""]) => Self::create_scanner(&mut state, table, request),
            (Method::GET, [_, "scanner", id]) => Self::fetch(&mut state, id),
            (Method::DELETE, [_, "scanner", id]) => match state.scanners.remove(*id) {
                Some(_) => GatewayResponse::status(200),
                None => GatewayResponse::status(404),
            },
            (Method::GET, [table, "multiget"]) => {
                let query = request.url.query().unwrap_or_default().to_string();
                let rows: Vec<WireRow> = query
                    .split('&')
                    .filter_map(|pair| pair.strip_prefix("row="))
                    .filter_map(|k| {
                        let key = percent_decode(k);
                        let cells = state.tables.get(*table)?.rows.get(&key)?;
                        Some(wire_row(&key, cells.iter()))
                    })
                    .collect();
                if rows.is_empty() {
                    GatewayResponse::status(404)
                } else {
                    json_response(200, serde_json::to_value(CellSet { rows }).unwrap())
                }
            }
            (Method::PUT, [table, _]) => Self::put(&mut state, table, request),
            (Method::GET, [table, _, rest @ ..]) => {
                let key = segments[1].clone();
                let column = rest.first().map(|_| segments[2].clone());
                let Some(cells) = state.tables.get(*table).and_then(|t| t.rows.get(&key)) else {
                    return GatewayResponse::status(404);
                };
                let selected: Vec<_> = cells
                    .iter()
                    .filter(|(c, _)| column.as_ref().map_or(true, |want| column_matches(want, c)))
                    .collect();
                if selected.is_empty() {
                    return GatewayResponse::status(404);
                }
                let row = wire_row(&key, selected.into_iter());
                json_response(200, serde_json::to_value(CellSet { rows: vec![row] }).unwrap())
            }
            _ => GatewayResponse::status(404),
        }
    }

    fn put(state: &mut FakeState, table: &str, request: &GatewayRequest) -> GatewayResponse {
        let Some(t) = state.tables.get_mut(table) else {
            return GatewayResponse::status(404);
        };
        let set: CellSet = serde_json::from_value(request.body.clone().unwrap_or_default()).unwrap();
        state.clock += 1;
        for row in set.rows {
            let key = encoding::decode("key", &row.key).unwrap();
            let cells = t.rows.entry(key).or_default();
            for cell in row.cells {
                let column = encoding::decode("column", &cell.column).unwrap();
                let value = encoding::decode("$", &cell.value).unwrap();
                cells.insert(column, (value, cell.timestamp.unwrap_or(state.clock)));
            }
        }
        GatewayResponse::status(200)
    }

    fn create_scanner(state: &mut FakeState, table: &str, request: &GatewayRequest) -> GatewayResponse {
        let Some(t) = state.tables.get(table) else {
            return GatewayResponse::status(404);
        };
        let model: ScannerModel =
            serde_json::from_value(request.body.clone().unwrap_or_default()).unwrap();
        let start = model.start_row.map(|s| encoding::decode("startRow", &s).unwrap());
        let end = model.end_row.map(|s| encoding::decode("endRow", &s).unwrap());
        let prefix = model.filter.map(|f| {
            let filter: serde_json::Value = serde_json::from_str(&f).unwrap();
            assert_eq!(filter["type"], "PrefixFilter");
            encoding::decode("filter", filter["value"].as_str().unwrap()).unwrap()
        });
        let columns: Vec<Vec<u8>> = model
            .column
            .iter()
            .map(|c| encoding::decode("column", c).unwrap())
            .collect();

        let mut cells = VecDeque::new();
        for (key, row) in &t.rows {
            if start.as_ref().is_some_and(|s| key < s) || end.as_ref().is_some_and(|e| key >= e) {
                continue;
            }
            if prefix.as_ref().is_some_and(|p| !key.starts_with(p)) {
                continue;
            }
            for (column, (value, ts)) in row {
                if !columns.is_empty() && !columns.iter().any(|want| column_matches(want, column)) {
                    continue;
                }
                if model.start_time.is_some_and(|s| *ts < s) || model.end_time.is_some_and(|e| *ts > e) {
                    continue;
                }
                cells.push_back((key.clone(), column.clone(), value.clone(), *ts));
            }
        }

        state.next_scanner += 1;
        let id = format!("{}{}", 1_500_000_000_000u64, state.next_scanner);
        state.scanners.insert(
            id.clone(),
            OpenScanner {
                cells,
                batch: model.batch as usize,
            },
        );
        GatewayResponse {
            status: 201,
            location: Some(format!("{BASE_URL}/{table}/scanner/{id}")),
            body: Vec::new(),
        }
    }

    fn fetch(state: &mut FakeState, id: &str) -> GatewayResponse {
        let Some(scanner) = state.scanners.get_mut(id) else {
            return GatewayResponse::status(404);
        };
        if scanner.cells.is_empty() {
            return GatewayResponse::status(204);
        }
        let take = scanner.batch.min(scanner.cells.len());
        let mut rows: Vec<WireRow> = Vec::new();
        for (key, column, value, ts) in scanner.cells.drain(..take) {
            let cell = WireCell {
                column: encoding::encode(&column),
                value: encoding::encode(&value),
                timestamp: Some(ts),
            };
            let wire_key = encoding::encode(&key);
            match rows.last_mut() {
                Some(last) if last.key == wire_key => last.cells.push(cell),
                _ => rows.push(WireRow {
                    key: wire_key,
                    cells: vec![cell],
                }),
            }
        }
        json_response(200, serde_json::to_value(CellSet { rows }).unwrap())
    }
}

fn column_matches(want: &[u8], column: &[u8]) -> bool {
    if want.contains(&b':') {
        want == column
    } else {
        column.starts_with(want) && column.get(want.len()) == Some(&b':')
    }
}

fn wire_row<'a>(key: &[u8], cells: impl Iterator<Item = (&'a Vec<u8>, &'a (Vec<u8>, i64))>) -> WireRow {
    WireRow {
        key: encoding::encode(key),
        cells: cells
            .map(|(column, (value, ts))| WireCell {
                column: encoding::encode(column),
                value: encoding::encode(value),
                timestamp: Some(*ts),
            })
            .collect(),
    }
}

#[async_trait]
impl Transport for FakeGateway {
    async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        Ok(self.handle(&request))
    }
}

// ---------------------------------------------------------------------------
// ScriptedGateway
// ---------------------------------------------------------------------------

/// One scripted scanner fetch.
#[derive(Debug, Clone)]
pub enum Fetch {
    /// 200 with these wire rows.
    Batch(Vec<WireRow>),
    /// Any other status.
    Status(u16),
    /// No response at all.
    Unreachable,
}

/// Replays a fixed scanner conversation.
#[derive(Debug)]
pub struct ScriptedGateway {
    create_status: u16,
    location: Option<String>,
    fetches: Mutex<VecDeque<Fetch>>,
    seen: Mutex<Vec<Seen>>,
    /// Time every request takes; a request is recorded once it completes.
    delay: Option<Duration>,
}

pub const CURSOR: &str = "http://gateway:8080/test/scanner/1500000000001";

impl ScriptedGateway {
    /// Scanner creation succeeds; fetches follow `fetches`, then 204 forever.
    pub fn new(fetches: Vec<Fetch>) -> Arc<Self> {
        Arc::new(Self {
            create_status: 201,
            location: Some(CURSOR.to_string()),
            fetches: Mutex::new(fetches.into()),
            seen: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    /// Like [`ScriptedGateway::new`], with every request taking `delay`.
    pub fn slow(fetches: Vec<Fetch>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            create_status: 201,
            location: Some(CURSOR.to_string()),
            fetches: Mutex::new(fetches.into()),
            seen: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    /// Scanner creation answers `status` with an optional `Location`.
    pub fn creation(status: u16, location: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            create_status: status,
            location: location.map(str::to_owned),
            fetches: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method) -> usize {
        self.seen().iter().filter(|s| s.method == method).count()
    }

    pub fn deletes_of_cursor(&self) -> usize {
        self.seen()
            .iter()
            .filter(|s| s.method == Method::DELETE && CURSOR.ends_with(&s.target))
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedGateway {
    async fn execute(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.seen.lock().unwrap().push(Seen {
            method: request.method.clone(),
            target: target(&request),
            body: request.body.clone(),
        });

        match request.method {
            Method::PUT => Ok(GatewayResponse {
                status: self.create_status,
                location: self.location.clone(),
                body: if self.create_status >= 300 {
                    b"Not found".to_vec()
                } else {
                    Vec::new()
                },
            }),
            Method::GET => match self.fetches.lock().unwrap().pop_front() {
                Some(Fetch::Batch(rows)) => {
                    Ok(json_response(200, serde_json::to_value(CellSet { rows }).unwrap()))
                }
                Some(Fetch::Status(status)) => Ok(GatewayResponse::status(status)),
                Some(Fetch::Unreachable) => Err(HBaseError::transport("connection reset by peer")),
                None => Ok(GatewayResponse::status(204)),
            },
            Method::DELETE => Ok(GatewayResponse::status(200)),
            _ => Ok(GatewayResponse::status(405)),
        }
    }
}

/// A wire row with `columns` cells, values derived from key and column.
pub fn wire(key: &str, columns: &[&str]) -> WireRow {
    WireRow {
        key: encoding::encode(key),
        cells: columns
            .iter()
            .enumerate()
            .map(|(i, column)| WireCell {
                column: encoding::encode(column),
                value: encoding::encode(format!("{key}={column}")),
                timestamp: Some(1_000 + i as i64),
            })
            .collect(),
    }
}

/// Spin the current-thread runtime until spawned cleanup has run.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
