//! Catalog search stage.
//!
//! Queries the STAC catalog for the most recent scene over the configured
//! AOI, resolves the red/NIR/SCL asset locations, and writes the scene
//! descriptor JSON into the working directory. On success the descriptor
//! filename is the sole line on stdout; all diagnostics go to stderr so the
//! orchestrator's captured hand-off value stays clean.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use pipeline_common::{PipelineConfig, PipelineResult, SceneDescriptor, StageResult};
use stac_client::{resolve_band_assets, StacClient};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const STAGE: &str = "scene-search";

#[derive(Parser, Debug)]
#[command(name = "scene-search")]
#[command(about = "Find the most recent Sentinel-2 scene over the configured AOI")]
struct Args {
    /// Pipeline configuration file
    #[arg(long, env = "PIPELINE_CONFIG", default_value = "config/pipeline.yaml")]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let config = PipelineConfig::load_or_default(&args.config)?;
    let work_dir = Path::new(".");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid pipeline configuration");
        StageResult::failed(STAGE, &e).save(work_dir).ok();
        std::process::exit(1);
    }

    info!(aoi = %config.aoi.name, collection = %config.catalog.collection, "Starting data discovery");

    match run(&config).await {
        Ok(Some(filename)) => {
            StageResult::succeeded(STAGE, &filename).save(work_dir)?;
            info!(descriptor = %filename, "Band URLs saved");
            println!("{}", filename);
            Ok(())
        }
        Ok(None) => {
            let message = format!(
                "no items in the last {} days over AOI '{}'",
                config.catalog.lookback_days, config.aoi.name
            );
            warn!(message = %message, "Could not find any recent items");
            StageResult::no_data(STAGE, &message).save(work_dir)?;
            Ok(())
        }
        Err(e) => {
            error!(error = %e, kind = e.kind(), "Catalog search failed");
            StageResult::failed(STAGE, &e).save(work_dir).ok();
            std::process::exit(1);
        }
    }
}

/// Search the catalog and persist a descriptor for the newest item, if any.
async fn run(config: &PipelineConfig) -> PipelineResult<Option<String>> {
    let client = StacClient::new(&config.catalog.url, config.catalog.retry.clone())?;

    let item = client
        .search_latest(
            &config.catalog.collection,
            &config.aoi.bbox,
            config.catalog.lookback_days,
            config.catalog.search_limit,
            Utc::now(),
        )
        .await?;

    let Some(item) = item else {
        return Ok(None);
    };

    info!(item_id = %item.id, datetime = ?item.datetime(), "Selected most recent item");

    let assets = resolve_band_assets(&item)?;
    let descriptor = SceneDescriptor {
        item_id: Some(item.id.clone()),
        item_datetime: item.datetime().map(str::to_string),
        assets,
    };

    let filename = SceneDescriptor::filename_for(&item.id);
    descriptor.save(Path::new(&filename))?;
    Ok(Some(filename))
}

fn init_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Stage diagnostics go to stderr; stdout carries only the hand-off line.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
