use anyhow::{Context, Result};
use clap::Parser;
use nba_ingest::{initialize_logging, IngestConfig, IngestionPipeline, StorageBackend};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Run the NBA player data ingestion once
#[derive(Parser, Debug)]
#[command(name = "nba-ingest", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the storage backend
    #[arg(long, value_enum)]
    backend: Option<StorageBackend>,

    /// Write to this directory instead of S3 (implies --backend local)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Exit 0 even when the fetch or upload failed
    #[arg(long)]
    lenient: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        IngestConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(backend) = args.backend {
        config.storage.backend = backend;
    }
    if let Some(dir) = args.output_dir {
        config.storage.backend = StorageBackend::Local;
        config.storage.local_root = dir;
    }

    initialize_logging(&config.logging)?;

    info!("Starting NBA ingestion v{}", env!("CARGO_PKG_VERSION"));
    for name in config.api.missing_settings() {
        warn!("{} is not set; the fetch will fail", name);
    }

    let pipeline = IngestionPipeline::from_config(&config).await?;
    let report = pipeline.run().await;

    println!("{}", report.summary());

    if !report.outcome.is_success() && !args.lenient {
        error!("Ingestion failed after {} ms", report.elapsed_ms());
        anyhow::bail!("ingestion failed: {}", report.summary());
    }

    info!("Ingestion finished in {} ms", report.elapsed_ms());
    Ok(())
}
