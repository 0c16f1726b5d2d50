//! Index computation stage.
//!
//! Takes a scene descriptor path, loads the red and NIR bands, computes
//! NDVI, and writes `ndvi_{item_id}.tif` into the working directory. The
//! output filename is the sole line on stdout; diagnostics go to stderr.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use ndvi::run_ndvi_stage;
use pipeline_common::StageResult;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

const STAGE: &str = "ndvi-compute";

#[derive(Parser, Debug)]
#[command(name = "ndvi-compute")]
#[command(about = "Compute an NDVI raster from a scene descriptor")]
struct Args {
    /// Path to the scene descriptor JSON with red and NIR band locations
    descriptor: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let work_dir = Path::new(".");
    info!(descriptor = %args.descriptor.display(), "Starting NDVI computation");

    match run_ndvi_stage(&args.descriptor, work_dir) {
        Ok(output) => {
            let artifact = output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| output.display().to_string());
            StageResult::succeeded(STAGE, &artifact).save(work_dir)?;
            println!("{}", artifact);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, kind = e.kind(), "NDVI computation failed");
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
