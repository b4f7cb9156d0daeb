//! High-score server.
//!
//! Serves the line-delimited JSON protocol from a file store under
//! `STACKLOGIC_DATA_DIR`. Logs go to stderr, filtered by `RUST_LOG`.

use std::sync::Arc;

use anyhow::{Context, Result};

use stacklogic::scores::{check_listen_available, run_server, FileStore, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    check_listen_available(&config.host, config.port)
        .with_context(|| format!("{}:{} is not available", config.host, config.port))?;

    let store = Arc::new(FileStore::in_dir(&config.data_dir));
    log::info!("high scores stored in {}", store.path().display());

    run_server(config, store, None).await
}
