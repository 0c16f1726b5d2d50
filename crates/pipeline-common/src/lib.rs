//! Common types and utilities shared across all sentinel-ndvi crates.

pub mod bbox;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod fs;
pub mod handoff;

pub use bbox::BoundingBox;
pub use config::{
    AoiConfig, CatalogConfig, CogConfig, Compression, PipelineConfig, Resampling, RetryConfig,
};
pub use descriptor::{BandAssets, SceneDescriptor};
pub use error::{PipelineError, PipelineResult};
pub use handoff::{StageResult, StageStatus};
