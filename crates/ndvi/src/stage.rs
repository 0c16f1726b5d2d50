//! Descriptor-driven NDVI stage logic.

use std::path::{Path, PathBuf};

use pipeline_common::{PipelineError, PipelineResult, SceneDescriptor};
use raster_io::{read_band, write_float32_geotiff, RasterProfile};
use tracing::info;

use crate::kernel::compute_ndvi;

/// Run the index computation for one scene descriptor.
///
/// Loads the red and near-infrared bands named by the descriptor, computes
/// NDVI, and writes `ndvi_{item_id}.tif` into `output_dir` (the shared
/// working directory), inheriting the red band's spatial profile with the
/// band count forced to 1 and the pixel type forced to float32. Returns the
/// output path.
pub fn run_ndvi_stage(descriptor_path: &Path, output_dir: &Path) -> PipelineResult<PathBuf> {
    let descriptor = SceneDescriptor::load(descriptor_path)?;
    info!(
        item_id = descriptor.item_id(),
        descriptor = %descriptor_path.display(),
        "Starting NDVI computation"
    );

    let red = read_band(descriptor.red_href()?)?;
    let nir = read_band(descriptor.nir_href()?)?;

    if red.shape() != nir.shape() {
        return Err(PipelineError::ShapeMismatch {
            red_width: red.width,
            red_height: red.height,
            nir_width: nir.width,
            nir_height: nir.height,
        });
    }

    let values = compute_ndvi(&red.data, &nir.data);

    let output = output_dir.join(descriptor.ndvi_filename());
    let profile = RasterProfile {
        projection: red.profile.projection.clone(),
        geo_transform: red.profile.geo_transform,
        // NDVI has its own value domain; the source nodata marker does not
        // carry over.
        nodata: None,
    };
    write_float32_geotiff(&output, red.width, red.height, values, &profile)?;

    info!(path = %output.display(), "NDVI raster written");
    Ok(output)
}
