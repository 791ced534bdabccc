// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>
//!
//! hbrest: command-line access to an HBase REST gateway.
//!
//! Connection settings come from flags, falling back to `HBASE_REST_URL`,
//! `HBASE_REST_TIMEOUT_MS` and `HBASE_REST_BATCH_SIZE`. Logging follows
//! `RUST_LOG` and goes to stderr.

mod formatter;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hbase_rest_client::config::{ENV_BATCH_SIZE, ENV_TIMEOUT_MS, ENV_URL};
use hbase_rest_client::{ClientConfig, GetOptions, HBaseClient, Row, ScanRequest};

use formatter::{format_names, format_rows, format_value, OutputFormat};

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

/// hbrest: query and administer HBase through its REST gateway.
#[derive(Parser, Debug)]
#[command(name = "hbrest", version = VERSION, about = "HBase REST gateway client")]
struct Cli {
    /// Gateway base URL.
    #[arg(long, global = true, env = ENV_URL)]
    url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, env = ENV_TIMEOUT_MS)]
    timeout_ms: Option<u64>,

    /// Default scan batch size in cells.
    #[arg(long = "default-batch-size", global = true, env = ENV_BATCH_SIZE)]
    default_batch_size: Option<u32>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Gateway software versions.
    Version,
    /// Cluster version and status.
    Status,
    /// List tables.
    Tables,
    /// List namespaces.
    Namespaces,
    /// Show a table schema.
    Schema { table: String },
    /// Read one row.
    Get {
        table: String,
        key: String,
        /// Restrict to `family` or `family:qualifier`.
        #[arg(long)]
        column: Option<String>,
        /// Maximum versions per cell.
        #[arg(long)]
        versions: Option<u32>,
        /// Show cell timestamps.
        #[arg(long)]
        timestamps: bool,
    },
    /// Scan a table.
    Scan {
        table: String,
        /// Only rows whose key starts with this prefix.
        #[arg(long, conflicts_with = "start_row")]
        prefix: Option<String>,
        /// First row key (inclusive).
        #[arg(long)]
        start_row: Option<String>,
        /// Last row key (exclusive).
        #[arg(long)]
        end_row: Option<String>,
        /// Restrict to `family` or `family:qualifier`; repeatable.
        #[arg(long = "column")]
        columns: Vec<String>,
        /// Cells per fetch.
        #[arg(long)]
        batch_size: Option<u32>,
        /// Stop after this many rows.
        #[arg(long)]
        limit: Option<usize>,
        /// Show cell timestamps.
        #[arg(long)]
        timestamps: bool,
    },
    /// Write cells to one row.
    Put {
        table: String,
        key: String,
        /// `family:qualifier=value`
        #[arg(required = true, value_parser = parse_cell)]
        cells: Vec<(String, String)>,
    },
}

/// Parse `family:qualifier=value`.
fn parse_cell(raw: &str) -> Result<(String, String), String> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected family:qualifier=value, got '{raw}'"))?;
    if !column.contains(':') || column.starts_with(':') {
        return Err(format!("column '{column}' must be family:qualifier"));
    }
    Ok((column.to_string(), value.to_string()))
}

impl Cli {
    fn config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::default();
        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(batch) = self.default_batch_size {
            config.default_batch_size = batch;
        }
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    tracing::debug!(url = %config.base_url, "connecting");
    let client = HBaseClient::from_config(config)?;

    let output = run(&client, cli.command, cli.format).await?;
    println!("{output}");
    Ok(())
}

async fn run(client: &HBaseClient, command: Command, format: OutputFormat) -> anyhow::Result<String> {
    let output = match command {
        Command::Version => {
            let info = client.version().await?;
            format_value(&serde_json::to_value(info)?, format)
        }
        Command::Status => {
            let version = client.cluster_version().await?;
            let status = client.cluster_status().await?;
            format_value(&serde_json::json!({ "version": version, "status": status }), format)
        }
        Command::Tables => format_names("table", &client.tables().await?, format),
        Command::Namespaces => format_names("namespace", &client.namespaces().await?, format),
        Command::Schema { table } => {
            let schema = client
                .table_schema(&table)
                .await?
                .with_context(|| format!("table '{table}' not found"))?;
            format_value(&serde_json::to_value(schema)?, format)
        }
        Command::Get {
            table,
            key,
            column,
            versions,
            timestamps,
        } => {
            let mut options = GetOptions::default().include_timestamp(timestamps);
            if let Some(column) = column {
                options = options.column(column);
            }
            if let Some(versions) = versions {
                options = options.versions(versions);
            }
            let row = client
                .get(&table, &key, &options)
                .await?
                .with_context(|| format!("row '{key}' not found in '{table}'"))?;
            format_rows(&[row], timestamps, format)
        }
        Command::Scan {
            table,
            prefix,
            start_row,
            end_row,
            columns,
            batch_size,
            limit,
            timestamps,
        } => {
            let mut request = ScanRequest::new(table)
                .columns(columns)
                .include_timestamp(timestamps);
            if let Some(prefix) = prefix {
                request = request.prefix(prefix);
            }
            if let Some(start) = start_row {
                request = request.start_row(start);
            }
            if let Some(end) = end_row {
                request = request.end_row(end);
            }
            if let Some(batch) = batch_size {
                request = request.batch_size(batch);
            }
            let rows = scan_rows(client, &request, limit).await?;
            format_rows(&rows, timestamps, format)
        }
        Command::Put { table, key, cells } => {
            let row = cells
                .into_iter()
                .fold(Row::new(key), |row, (column, value)| row.with_column(column, value));
            if !client.put(&table, &[row]).await? {
                bail!("gateway rejected the write to '{table}'");
            }
            "ok".to_string()
        }
    };
    Ok(output)
}

/// Read up to `limit` rows, releasing the cursor before returning.
async fn scan_rows(
    client: &HBaseClient,
    request: &ScanRequest,
    limit: Option<usize>,
) -> anyhow::Result<Vec<Row>> {
    let limit = limit.unwrap_or(usize::MAX);
    let mut scanner = client.open_scanner(request).await?;
    let mut rows = Vec::new();
    while rows.len() < limit {
        match scanner.next_row().await? {
            Some(row) => rows.push(row),
            None => break,
        }
    }
    scanner.close().await;
    Ok(rows)
}
