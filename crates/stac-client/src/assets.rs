//! Band asset resolution for Sentinel-2 items.

use pipeline_common::{BandAssets, PipelineError, PipelineResult};
use tracing::warn;

use crate::models::Item;

/// Resolve the red, near-infrared, and cloud-mask asset locations.
///
/// Catalogs differ on asset naming: Earth Search exposes `red`/`nir`, other
/// deployments keep the raw Sentinel-2 band codes `B04`/`B08`. Red and NIR
/// are required; the scene classification layer (`scl`, no fallback) is
/// optional and only carried along for future masking.
pub fn resolve_band_assets(item: &Item) -> PipelineResult<BandAssets> {
    let red = first_href(item, &["red", "B04"]);
    let nir = first_href(item, &["nir", "B08"]);
    let scl = first_href(item, &["scl"]);

    if red.is_none() || nir.is_none() {
        return Err(PipelineError::MissingRequiredAsset(format!(
            "item '{}' exposes neither red/B04 nor nir/B08: red={:?}, nir={:?}",
            item.id, red, nir
        )));
    }
    if scl.is_none() {
        warn!(item = %item.id, "SCL (cloud mask) asset not found for this item");
    }

    Ok(BandAssets { red, nir, scl })
}

fn first_href(item: &Item, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| item.assets.get(*key).map(|a| a.href.clone()))
}
