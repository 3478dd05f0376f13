//! CLI module for status-server
//!
//! コマンドラインフラグは明示設定として扱い、未指定のものは環境変数・
//! デフォルト値の解決に委ねる。

use clap::Parser;
use status_common::config::{PortValue, StatusSettings};

/// Standalone server exposing the status endpoint
#[derive(Parser, Debug, Clone)]
#[command(name = "status-server")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    STATUS_BIND               Listen address (default: 0.0.0.0:8000)
    STATUS_DATABASE_URL       SQLite URL probed by the health check
    STATUS_ENDPOINT           Endpoint path (default: status)
    STATUS_SCHEME             Advertised scheme (default: http)
    STATUS_HOST, HOST         Advertised host (default: localhost)
    STATUS_PORT, PORT         Advertised port (default: listen port)
    STATUS_PROBE_TIMEOUT_MS   Database probe timeout (default: 2000)
    STATUS_LOG_LEVEL          Log level (default: info)
"#)]
pub struct Cli {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "STATUS_BIND")]
    pub bind: String,

    /// SQLite database URL to probe (omit to run without a dependency)
    #[arg(long, env = "STATUS_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Endpoint path
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Advertised scheme (http or https)
    #[arg(long)]
    pub scheme: Option<String>,

    /// Advertised host
    #[arg(long)]
    pub host: Option<String>,

    /// Advertised port
    #[arg(long)]
    pub port: Option<String>,

    /// Database probe timeout in milliseconds
    #[arg(long)]
    pub probe_timeout_ms: Option<u64>,
}

impl Cli {
    /// フラグから明示設定を組み立てる
    pub fn settings(&self) -> StatusSettings {
        StatusSettings {
            endpoint: self.endpoint.clone(),
            scheme: self.scheme.clone(),
            host: self.host.clone(),
            port: self.port.clone().map(PortValue::Text),
            probe_timeout_ms: self.probe_timeout_ms,
        }
    }
}
