//! Pipeline configuration loaded from a YAML file.
//!
//! AOI, catalog, and repackaging parameters are run configuration rather than
//! code constants, so a different area of interest or codec never needs a
//! code edit. Every field has a documented serde default; a missing config
//! file yields the built-in defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bbox::BoundingBox;
use crate::error::{PipelineError, PipelineResult};

/// Root pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub aoi: AoiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cog: CogConfig,
}

/// Area of interest for catalog search.
#[derive(Debug, Clone, Deserialize)]
pub struct AoiConfig {
    pub name: String,
    pub bbox: BoundingBox,
}

/// STAC catalog endpoint and search window.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Trailing search window in days.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    /// Maximum number of items requested from the catalog.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Bounded retry with exponential backoff for catalog requests.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial retry delay in seconds (doubles each retry).
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

/// COG repackaging parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CogConfig {
    /// Square tile edge in pixels; GDAL requires a multiple of 16.
    #[serde(default = "default_blocksize")]
    pub blocksize: u32,
    #[serde(default)]
    pub compression: Compression,
    #[serde(default = "default_overview_levels")]
    pub overview_levels: Vec<i32>,
    #[serde(default)]
    pub resampling: Resampling,
}

/// Compression codec for the COG container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Zstd,
    Deflate,
    Lzw,
}

impl Compression {
    pub fn gdal_name(&self) -> &'static str {
        match self {
            Compression::Zstd => "ZSTD",
            Compression::Deflate => "DEFLATE",
            Compression::Lzw => "LZW",
        }
    }
}

/// Resampling method for overview building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resampling {
    #[default]
    Average,
    Nearest,
    Cubic,
}

impl Resampling {
    pub fn gdal_name(&self) -> &'static str {
        match self {
            Resampling::Average => "AVERAGE",
            Resampling::Nearest => "NEAREST",
            Resampling::Cubic => "CUBIC",
        }
    }
}

fn default_catalog_url() -> String {
    "https://earth-search.aws.element84.com/v1".to_string()
}

fn default_collection() -> String {
    "sentinel-2-l2a".to_string()
}

fn default_lookback_days() -> i64 {
    30
}

fn default_search_limit() -> usize {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_secs() -> u64 {
    2
}

fn default_max_delay_secs() -> u64 {
    60
}

fn default_blocksize() -> u32 {
    512
}

fn default_overview_levels() -> Vec<i32> {
    vec![2, 4, 8, 16, 32]
}

impl Default for AoiConfig {
    fn default() -> Self {
        Self {
            name: "Ashdod".to_string(),
            bbox: BoundingBox::new(34.55, 31.75, 34.75, 31.85),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            collection: default_collection(),
            lookback_days: default_lookback_days(),
            search_limit: default_search_limit(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_secs: default_initial_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl Default for CogConfig {
    fn default() -> Self {
        Self {
            blocksize: default_blocksize(),
            compression: Compression::default(),
            overview_levels: default_overview_levels(),
            resampling: Resampling::default(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            aoi: AoiConfig::default(),
            catalog: CatalogConfig::default(),
            cog: CogConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file, or fall back to the built-in
    /// defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: PipelineConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!(path = %path.display(), aoi = %config.aoi.name, "Loaded pipeline config");
        Ok(config)
    }

    /// Validate field-level constraints.
    pub fn validate(&self) -> PipelineResult<()> {
        self.aoi.bbox.validate()?;
        if self.catalog.lookback_days <= 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "lookback_days must be positive, got {}",
                self.catalog.lookback_days
            )));
        }
        if self.catalog.search_limit == 0 {
            return Err(PipelineError::InvalidConfig(
                "search_limit must be at least 1".into(),
            ));
        }
        if self.cog.blocksize == 0 || self.cog.blocksize % 16 != 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "blocksize must be a positive multiple of 16, got {}",
                self.cog.blocksize
            )));
        }
        if self.cog.overview_levels.iter().any(|&f| f < 2) {
            return Err(PipelineError::InvalidConfig(
                "overview levels must be downsampling factors >= 2".into(),
            ));
        }
        Ok(())
    }
}
