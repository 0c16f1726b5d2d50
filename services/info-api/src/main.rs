//! Dashboard info service.
//!
//! A stateless HTTP surface with three endpoints: a root greeting, an
//! echo-style item handler, and a health/info endpoint. It shares nothing
//! with the processing pipeline.

mod routes;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "info-api")]
#[command(about = "Health/info API for the NDVI dashboard")]
struct Args {
    /// Listen address
    #[arg(short, long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(listen = %args.listen, "Starting info API server");

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, routes::router()).await?;
    Ok(())
}
