//! Error types for the sentinel-ndvi pipeline.

use thiserror::Error;

/// Result type alias using PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Primary error type for pipeline stages.
///
/// Every variant is terminal for the stage that raises it: stages log a
/// banner, write a `failed` hand-off record, and exit without producing an
/// artifact line. Nothing here is retried at the stage level (the STAC client
/// retries transient transport failures internally before giving up with
/// `CatalogConnection`).
#[derive(Debug, Error)]
pub enum PipelineError {
    // === Catalog search ===
    #[error("Failed to reach STAC catalog: {0}")]
    CatalogConnection(String),

    #[error("No items found in the search window")]
    NoItemsFound,

    #[error("Missing required asset: {0}")]
    MissingRequiredAsset(String),

    // === Index computation ===
    #[error("Invalid scene descriptor: {0}")]
    DescriptorInvalid(String),

    #[error("Failed to read band: {0}")]
    BandRead(String),

    #[error("Band shape mismatch: red is {red_width}x{red_height}, nir is {nir_width}x{nir_height}")]
    ShapeMismatch {
        red_width: usize,
        red_height: usize,
        nir_width: usize,
        nir_height: usize,
    },

    // === COG repackaging ===
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("COG conversion failed: {0}")]
    Conversion(String),

    // === Infrastructure ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Stable machine-readable kind string, used in stage hand-off records.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::CatalogConnection(_) => "CatalogConnectionError",
            PipelineError::NoItemsFound => "NoItemsFound",
            PipelineError::MissingRequiredAsset(_) => "MissingRequiredAsset",
            PipelineError::DescriptorInvalid(_) => "DescriptorInvalid",
            PipelineError::BandRead(_) => "BandReadError",
            PipelineError::ShapeMismatch { .. } => "ShapeMismatch",
            PipelineError::InputNotFound(_) => "InputNotFound",
            PipelineError::Conversion(_) => "ConversionError",
            PipelineError::InvalidConfig(_) => "InvalidConfig",
            PipelineError::Io(_) => "IoError",
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::DescriptorInvalid(format!("JSON error: {}", err))
    }
}
