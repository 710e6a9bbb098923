//! sweep-ingest - batch-populate tickets from a camera image drop

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sweep_server::Config;
use sweep_server::db;
use sweep_server::db::repository::TicketRepository;
use sweep_server::services::{HttpObjectStore, ObjectStore};
use tracing_subscriber::EnvFilter;

use sweep_ingest::{CameraCatalog, IngestJob};

/// Batch-ingest litter tickets from a camera image drop
#[derive(Parser, Debug)]
#[command(name = "sweep-ingest")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory of camera images named {camera}_s{severity}.png
    #[arg(long)]
    images: PathBuf,

    /// Camera catalog: local JSON file or http(s) URL
    #[arg(long)]
    catalog: String,

    /// Cap the number of files processed this run
    #[arg(long)]
    limit: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_target(false)
        .init();

    // Missing required vars abort here, before any side effect
    let config = Config::from_env().context("loading configuration")?;

    let database = db::connect(&config.database_path)
        .await
        .context("opening database")?;
    let tickets = TicketRepository::new(database);

    let store: Arc<dyn ObjectStore> = Arc::new(HttpObjectStore::new(
        config.object_store_url.clone(),
        config.object_store_token.clone(),
        Duration::from_millis(config.request_timeout_ms),
    )?);

    let catalog = CameraCatalog::load(&cli.catalog).await?;
    tracing::info!(cameras = catalog.len(), "Camera catalog loaded");

    let job = IngestJob::new(tickets, store, catalog, cli.limit);
    let stats = job.run(&cli.images).await?;

    if stats.created == 0 && stats.scanned > 0 {
        tracing::info!("Nothing new to ingest");
    }
    Ok(())
}
