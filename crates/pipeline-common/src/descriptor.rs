//! Scene descriptor: the file-persisted hand-off between catalog search and
//! index computation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::fs::write_atomic;

/// Fallback item id when a descriptor carries none.
pub const UNKNOWN_ITEM_ID: &str = "unknown_item";

/// Resolved band asset locations for one scene.
///
/// `red` and `nir` are required by index computation; `scl` (the scene
/// classification / cloud-mask layer) is carried along when present but has
/// no consumer yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandAssets {
    pub red: Option<String>,
    pub nir: Option<String>,
    pub scl: Option<String>,
}

/// A scene descriptor, written once by catalog search and read once by index
/// computation. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub item_datetime: Option<String>,
    pub assets: BandAssets,
}

impl SceneDescriptor {
    /// The scene id, or the documented fallback when absent.
    pub fn item_id(&self) -> &str {
        self.item_id.as_deref().unwrap_or(UNKNOWN_ITEM_ID)
    }

    /// Deterministic descriptor filename for a scene id.
    pub fn filename_for(item_id: &str) -> String {
        format!("{}_bands.json", item_id)
    }

    /// Deterministic NDVI output filename for this descriptor.
    pub fn ndvi_filename(&self) -> String {
        format!("ndvi_{}.tif", self.item_id())
    }

    /// The red band location, required for index computation.
    pub fn red_href(&self) -> PipelineResult<&str> {
        self.assets
            .red
            .as_deref()
            .ok_or_else(|| PipelineError::DescriptorInvalid("missing 'red' asset".into()))
    }

    /// The near-infrared band location, required for index computation.
    pub fn nir_href(&self) -> PipelineResult<&str> {
        self.assets
            .nir
            .as_deref()
            .ok_or_else(|| PipelineError::DescriptorInvalid("missing 'nir' asset".into()))
    }

    /// Load a descriptor from a JSON file.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::DescriptorInvalid(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            PipelineError::DescriptorInvalid(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    /// Atomically persist the descriptor as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(path, &json)
    }
}
