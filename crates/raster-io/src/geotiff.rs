//! Single-band float32 GeoTIFF writing.

use std::path::Path;

use gdal::raster::Buffer;
use gdal::DriverManager;
use pipeline_common::fs::{partial_path, promote_partial};
use pipeline_common::{PipelineError, PipelineResult};
use tracing::info;

use crate::band::RasterProfile;

/// Write `data` as a single-band float32 GeoTIFF carrying `profile`.
///
/// The band count is always 1 and the pixel type always float32 here,
/// whatever the source bands looked like. The file is materialized under a
/// `.partial` name and renamed into place once fully written.
pub fn write_float32_geotiff(
    path: &Path,
    width: usize,
    height: usize,
    data: Vec<f32>,
    profile: &RasterProfile,
) -> PipelineResult<()> {
    if data.len() != width * height {
        return Err(PipelineError::Conversion(format!(
            "buffer length {} does not match {}x{}",
            data.len(),
            width,
            height
        )));
    }

    let tmp = partial_path(path);
    let tmp_str = tmp
        .to_str()
        .ok_or_else(|| PipelineError::Conversion(format!("non-UTF8 path: {}", tmp.display())))?;

    let driver = DriverManager::get_driver_by_name("GTiff")
        .map_err(|e| PipelineError::Conversion(e.to_string()))?;

    {
        let mut dataset = driver
            .create_with_band_type_with_options::<f32, _>(
                tmp_str,
                width as isize,
                height as isize,
                1,
                &[],
            )
            .map_err(|e| PipelineError::Conversion(e.to_string()))?;

        if !profile.projection.is_empty() {
            dataset
                .set_projection(&profile.projection)
                .map_err(|e| PipelineError::Conversion(e.to_string()))?;
        }
        if let Some(transform) = profile.geo_transform {
            dataset
                .set_geo_transform(&transform)
                .map_err(|e| PipelineError::Conversion(e.to_string()))?;
        }

        let mut band = dataset
            .rasterband(1)
            .map_err(|e| PipelineError::Conversion(e.to_string()))?;
        if let Some(nodata) = profile.nodata {
            band.set_no_data_value(Some(nodata))
                .map_err(|e| PipelineError::Conversion(e.to_string()))?;
        }

        let buffer = Buffer::new((width, height), data);
        band.write((0, 0), (width, height), &buffer)
            .map_err(|e| PipelineError::Conversion(e.to_string()))?;
        // Dataset drops here, flushing the file before the rename.
    }

    promote_partial(path)?;
    info!(path = %path.display(), width = width, height = height, "GeoTIFF written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::read_band;

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tif");
        let profile = RasterProfile {
            projection: String::new(),
            geo_transform: Some([34.55, 0.0001, 0.0, 31.85, 0.0, -0.0001]),
            nodata: None,
        };
        write_float32_geotiff(&path, 2, 2, vec![0.5, -0.25, 1.0, 0.0], &profile).unwrap();
        assert!(path.exists());

        let band = read_band(path.to_str().unwrap()).unwrap();
        assert_eq!(band.shape(), (2, 2));
        assert_eq!(band.data, vec![0.5, -0.25, 1.0, 0.0]);
        assert_eq!(
            band.profile.geo_transform,
            Some([34.55, 0.0001, 0.0, 31.85, 0.0, -0.0001])
        );
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tif");
        let err =
            write_float32_geotiff(&path, 2, 2, vec![0.0; 3], &RasterProfile::default()).unwrap_err();
        assert_eq!(err.kind(), "ConversionError");
        assert!(!path.exists());
    }
}
