//! Wire types for the STAC search API.
//!
//! Only the fields this pipeline reads are modeled; everything else in the
//! catalog response is ignored by serde.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One asset attached to a catalog item (a band file, a mask, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub href: String,
}

/// Item properties; `datetime` is the acquisition timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemProperties {
    #[serde(default)]
    pub datetime: Option<String>,
}

/// A STAC item: one satellite scene with its band assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub properties: ItemProperties,
    #[serde(default)]
    pub assets: HashMap<String, Asset>,
}

impl Item {
    pub fn datetime(&self) -> Option<&str> {
        self.properties.datetime.as_deref()
    }
}

/// The FeatureCollection wrapper returned by `POST /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemCollection {
    #[serde(default)]
    pub features: Vec<Item>,
}

/// Sort clause for the search body.
#[derive(Debug, Clone, Serialize)]
pub struct SortBy {
    pub field: String,
    pub direction: String,
}

impl SortBy {
    /// Most recent acquisition first.
    pub fn datetime_descending() -> Self {
        Self {
            field: "properties.datetime".to_string(),
            direction: "desc".to_string(),
        }
    }
}

/// Request body for `POST {base}/search`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchBody {
    pub collections: Vec<String>,
    pub bbox: [f64; 4],
    /// RFC 3339 interval, "start/end".
    pub datetime: String,
    pub sortby: Vec<SortBy>,
    pub limit: usize,
}
