//! Ledger Node
//!
//! Entry point: parse configuration, initialize logging, install the
//! genesis block, then serve the HTTP API until shutdown.

use anyhow::{Context, Result};
use clap::Parser;

use ledger_core::config::Config;
use ledger_core::logging::init_logging;
use ledger_core::node::create_genesis_block;
use ledger_core::rpc::{create_router, serve};
use ledger_core::storage::ChainStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config.log_level, config.log_format).context("failed to initialize logging")?;

    tracing::info!(
        listen = %config.listen_addr(),
        request_timeout_secs = config.request_timeout_secs,
        max_body_bytes = config.max_body_bytes,
        "starting ledger-node"
    );

    // Genesis must be in place before the listener accepts anything
    let store = ChainStore::new();
    let genesis = create_genesis_block().context("failed to create genesis block")?;
    tracing::info!(timestamp = %genesis.timestamp, "genesis block created");
    store
        .initialize(genesis)
        .context("failed to install genesis block")?;

    let router = create_router(store, config.server_config());
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", addr))?;

    serve(listener, router).await.context("HTTP server error")?;

    tracing::info!("ledger-node stopped");
    Ok(())
}
