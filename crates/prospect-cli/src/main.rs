use anyhow::{Context, Result};
use clap::Parser;
use prospect_core::{BroadcastHub, RecordStore};
use prospect_ingest::{ChangeWatcher, IngestPipeline};
use prospect_web::{start_server, AppState, WebConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod cli;
mod config;

use cli::Cli;
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = format!(
        "prospect_cli={log_level},prospect_core={log_level},prospect_ingest={log_level},prospect_web={log_level}"
    );
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    let config = AppConfig::load(&cli)?;

    std::fs::create_dir_all(&config.exports_dir).with_context(|| {
        format!(
            "Failed to create exports directory {}",
            config.exports_dir.display()
        )
    })?;

    let store = Arc::new(RecordStore::new());
    let hub = BroadcastHub::new();

    // Partitions are not persisted; rebuild them from the files on disk.
    let mut pipeline = IngestPipeline::new(&config.exports_dir, store.clone(), hub.clone());
    let files = pipeline.scan_all()?;
    info!(
        files,
        general = store.len(prospect_core::Partition::General),
        qualified = store.len(prospect_core::Partition::Qualified),
        "Initial scan complete"
    );

    // The watcher handle must outlive the server; dropping it stops the
    // OS notification stream.
    let (_watcher, file_events) = ChangeWatcher::spawn(
        &config.exports_dir,
        Duration::from_millis(config.debounce_ms),
    )?;
    tokio::spawn(pipeline.run(file_events));

    let state = AppState::new(store, hub);
    let web_config = WebConfig {
        host: config.host.clone(),
        port: config.port,
    };
    start_server(&web_config, state).await?;

    Ok(())
}
