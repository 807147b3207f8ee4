//! Node configuration
//!
//! Command-line flags, each of which can also be supplied through the
//! environment. `ADDR` carries the listen port for compatibility with
//! existing deployments.

use clap::Parser;
use std::time::Duration;

use crate::logging::LogFormat;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default maximum request body size (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1 << 20;

/// In-memory hash-linked ledger node.
#[derive(Parser, Debug, Clone)]
#[command(name = "ledger-node", about = "In-memory hash-linked ledger node", version)]
pub struct Config {
    /// Interface to bind the HTTP API on.
    #[arg(long, env = "LEDGER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the HTTP API.
    #[arg(long, short = 'p', env = "ADDR", default_value_t = 8080)]
    pub port: u16,

    /// Seconds before an in-flight request is aborted.
    #[arg(long, env = "LEDGER_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// Largest accepted request body in bytes.
    #[arg(long, env = "LEDGER_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Default tracing filter; `RUST_LOG` takes precedence when set.
    #[arg(long, env = "LEDGER_LOG", default_value = "ledger_core=info,ledger_node=info,tower_http=info")]
    pub log_level: String,

    /// Log output format: `pretty` or `json`.
    #[arg(long, env = "LEDGER_LOG_FORMAT", default_value = "pretty", value_parser = parse_log_format)]
    pub log_format: LogFormat,
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    Ok(LogFormat::from_str_lossy(s))
}

impl Config {
    /// `host:port` string suitable for binding a listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// Limits applied by the HTTP middleware stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
