//! Pipeline orchestrator.
//!
//! Runs the fixed linear chain
//! `ensure-working-directory -> scene-search -> ndvi-compute -> cog-convert`.
//! Each stage is a child process executed in the shared working directory;
//! its artifact path (taken from the typed hand-off record, falling back to
//! the last stdout line) becomes the next stage's sole argument. No
//! branching, no fan-out, no retry: a failed node stops the chain and its
//! dependents never run.

mod chain;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use chain::{run_chain, ChainOutcome};

#[derive(Parser, Debug)]
#[command(name = "orchestrator")]
#[command(about = "Run the Sentinel-2 NDVI processing chain")]
struct Args {
    /// Shared working directory for all pipeline artifacts
    #[arg(long, env = "PROCESSING_DIR", default_value = "processing_output")]
    work_dir: PathBuf,

    /// Directory containing the stage binaries (default: alongside this binary)
    #[arg(long)]
    bin_dir: Option<PathBuf>,

    /// Pipeline configuration file, forwarded to every stage
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

    let run_id = Uuid::new_v4();
    info!(run_id = %run_id, work_dir = %args.work_dir.display(), "Starting pipeline run");

    let bin_dir = match args.bin_dir {
        Some(dir) => dir,
        None => std::env::current_exe()
            .context("Cannot locate the orchestrator binary")?
            .parent()
            .context("Orchestrator binary has no parent directory")?
            .to_path_buf(),
    };

    // Forward an absolute config path: stages run with the working directory
    // as their cwd, so a relative path would resolve against the wrong base.
    let config = if args.config.is_absolute() {
        args.config.clone()
    } else {
        std::env::current_dir()?.join(&args.config)
    };

    match run_chain(&args.work_dir, &bin_dir, &config, run_id)? {
        ChainOutcome::Completed { artifact } => {
            info!(run_id = %run_id, artifact = %artifact, "Pipeline run complete");
            Ok(())
        }
        ChainOutcome::NoData => {
            info!(run_id = %run_id, "No recent scenes found; remaining stages skipped");
            Ok(())
        }
        ChainOutcome::Failed { node } => {
            error!(run_id = %run_id, node = %node, "Pipeline run failed");
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
