//! COG repackaging stage.
//!
//! Takes a GeoTIFF path and rewrites it as a Cloud-Optimized GeoTIFF
//! (`{stem}_cog{ext}` next to the input): tiled, compressed, with overview
//! levels. The output path is the sole line on stdout; diagnostics go to
//! stderr.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use pipeline_common::{PipelineConfig, StageResult};
use raster_io::convert_to_cog;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

const STAGE: &str = "cog-convert";

#[derive(Parser, Debug)]
#[command(name = "cog-convert")]
#[command(about = "Convert a GeoTIFF to a Cloud-Optimized GeoTIFF")]
struct Args {
    /// Path to the input GeoTIFF
    input: PathBuf,

    /// Pipeline configuration file (for blocksize, codec, overview levels)
    #[arg(long, env = "PIPELINE_CONFIG", default_value = "config/pipeline.yaml")]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
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

    match convert_to_cog(&args.input, &config.cog) {
        Ok(output) => {
            let artifact = output.display().to_string();
            StageResult::succeeded(STAGE, &artifact).save(work_dir)?;
            info!(path = %artifact, "COG ready");
            println!("{}", artifact);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, kind = e.kind(), "COG conversion failed");
            StageResult::failed(STAGE, &e).save(work_dir).ok();
            std::process::exit(1);
        }
    }
}

fn init_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
