//! Single-band reads with spatial profile capture.

use std::path::Path;

use gdal::Dataset;
use pipeline_common::{PipelineError, PipelineResult};
use tracing::{debug, info};

/// Georeferencing profile carried from a source band to derived rasters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RasterProfile {
    /// Projection as WKT; empty when the source has none.
    pub projection: String,
    /// Affine geotransform, when the source has one.
    pub geo_transform: Option<[f64; 6]>,
    pub nodata: Option<f64>,
}

/// One raster band held in memory as float32 samples.
#[derive(Debug, Clone)]
pub struct BandData {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
    pub profile: RasterProfile,
}

impl BandData {
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

/// Map an asset href to a GDAL-openable path.
///
/// Remote hrefs go through GDAL's `/vsicurl/` virtual filesystem; local
/// paths pass through unchanged.
pub fn gdal_path(href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        format!("/vsicurl/{}", href)
    } else {
        href.to_string()
    }
}

/// Read band 1 of `href` as float32, together with its spatial profile.
pub fn read_band(href: &str) -> PipelineResult<BandData> {
    let path = gdal_path(href);
    info!(href = href, "Opening band");

    let dataset = Dataset::open(Path::new(&path))
        .map_err(|e| PipelineError::BandRead(format!("{}: {}", href, e)))?;

    let (width, height) = dataset.raster_size();
    let band = dataset
        .rasterband(1)
        .map_err(|e| PipelineError::BandRead(format!("{}: {}", href, e)))?;

    let buffer = band
        .read_as::<f32>((0, 0), (width, height), (width, height), None)
        .map_err(|e| PipelineError::BandRead(format!("{}: {}", href, e)))?;

    let profile = RasterProfile {
        projection: dataset.projection(),
        geo_transform: dataset.geo_transform().ok(),
        nodata: band.no_data_value(),
    };

    debug!(width = width, height = height, "Band read into memory");

    Ok(BandData {
        width,
        height,
        data: buffer.data,
        profile,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gdal_path_remote() {
        assert_eq!(
            gdal_path("https://example.com/B04.tif"),
            "/vsicurl/https://example.com/B04.tif"
        );
        assert_eq!(
            gdal_path("http://example.com/B04.tif"),
            "/vsicurl/http://example.com/B04.tif"
        );
    }

    #[test]
    fn test_gdal_path_local() {
        assert_eq!(gdal_path("r.tif"), "r.tif");
        assert_eq!(gdal_path("/data/r.tif"), "/data/r.tif");
    }

    #[test]
    fn test_read_missing_file_is_band_read_error() {
        let err = read_band("/nonexistent/band.tif").unwrap_err();
        assert_eq!(err.kind(), "BandReadError");
    }
}
