//! Cloud-Optimized GeoTIFF repackaging.
//!
//! Two passes, in a fixed order: first all bands are copied verbatim into a
//! new tiled, compressed GTiff container; then the written file is reopened
//! for update and overview imagery is appended. Overview building needs the
//! materialized tiled base image to sample from, so the order is load-bearing.
//! Both passes run against a `.partial` sibling which is renamed into place
//! only after the overviews succeed.

use std::path::{Path, PathBuf};

use gdal::errors::GdalError;
use gdal::raster::{GdalDataType, GdalType, RasterCreationOption};
use gdal::{Dataset, DatasetOptions, DriverManager, GdalOpenFlags};
use pipeline_common::fs::{partial_path, promote_partial};
use pipeline_common::{CogConfig, PipelineError, PipelineResult};
use tracing::{debug, info};

/// Deterministic output path: `{stem}_cog{ext}` next to the resolved input.
pub fn cog_output_path(input: &Path) -> PipelineResult<PathBuf> {
    let abs = std::fs::canonicalize(input)?;
    let stem = abs
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PipelineError::Conversion(format!("no file stem: {}", abs.display())))?;
    let name = match abs.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_cog.{}", stem, ext),
        None => format!("{}_cog", stem),
    };
    Ok(abs.with_file_name(name))
}

/// Keep only the downsampling factors the image size supports.
pub fn clamp_overview_levels(levels: &[i32], width: usize, height: usize) -> Vec<i32> {
    let max_factor = width.min(height);
    levels
        .iter()
        .copied()
        .filter(|&f| f >= 2 && (f as usize) <= max_factor)
        .collect()
}

/// Rewrite `input` as a Cloud-Optimized GeoTIFF per `config`.
///
/// Returns the output path. The input is left untouched.
pub fn convert_to_cog(input: &Path, config: &CogConfig) -> PipelineResult<PathBuf> {
    if !input.exists() {
        return Err(PipelineError::InputNotFound(input.display().to_string()));
    }

    let output = cog_output_path(input)?;
    let tmp = partial_path(&output);
    let tmp_str = tmp
        .to_str()
        .ok_or_else(|| PipelineError::Conversion(format!("non-UTF8 path: {}", tmp.display())))?
        .to_string();

    info!(
        input = %input.display(),
        output = %output.display(),
        blocksize = config.blocksize,
        compression = config.compression.gdal_name(),
        "Starting COG conversion"
    );

    let src = Dataset::open(input).map_err(conversion_err)?;
    let (width, height) = src.raster_size();
    let band_count = src.raster_count();
    let band_type = src.rasterband(1).map_err(conversion_err)?.band_type();
    for i in 2..=band_count {
        if src.rasterband(i).map_err(conversion_err)?.band_type() != band_type {
            return Err(PipelineError::Conversion(
                "mixed band data types are not supported".into(),
            ));
        }
    }

    let blocksize = config.blocksize.to_string();
    let options = [
        RasterCreationOption {
            key: "TILED",
            value: "YES",
        },
        RasterCreationOption {
            key: "BLOCKXSIZE",
            value: &blocksize,
        },
        RasterCreationOption {
            key: "BLOCKYSIZE",
            value: &blocksize,
        },
        RasterCreationOption {
            key: "COMPRESS",
            value: config.compression.gdal_name(),
        },
    ];

    // Pass 1: copy every band into the tiled, compressed container.
    match band_type {
        GdalDataType::UInt8 => {
            write_base_image::<u8>(&src, &tmp_str, width, height, band_count, &options)
        }
        GdalDataType::UInt16 => {
            write_base_image::<u16>(&src, &tmp_str, width, height, band_count, &options)
        }
        GdalDataType::Int16 => {
            write_base_image::<i16>(&src, &tmp_str, width, height, band_count, &options)
        }
        GdalDataType::UInt32 => {
            write_base_image::<u32>(&src, &tmp_str, width, height, band_count, &options)
        }
        GdalDataType::Int32 => {
            write_base_image::<i32>(&src, &tmp_str, width, height, band_count, &options)
        }
        GdalDataType::Float32 => {
            write_base_image::<f32>(&src, &tmp_str, width, height, band_count, &options)
        }
        GdalDataType::Float64 => {
            write_base_image::<f64>(&src, &tmp_str, width, height, band_count, &options)
        }
        other => {
            return Err(PipelineError::Conversion(format!(
                "unsupported band data type: {:?}",
                other
            )));
        }
    }
    .map_err(conversion_err)?;
    debug!(path = %tmp.display(), "Base image written");

    // Pass 2: reopen the written file for update and append overviews.
    let levels = clamp_overview_levels(&config.overview_levels, width, height);
    if !levels.is_empty() {
        let update_options = DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_UPDATE | GdalOpenFlags::GDAL_OF_RASTER,
            ..Default::default()
        };
        let mut dst = Dataset::open_ex(&tmp, update_options).map_err(conversion_err)?;
        dst.build_overviews(config.resampling.gdal_name(), &levels, &[])
            .map_err(conversion_err)?;
        debug!(levels = ?levels, resampling = config.resampling.gdal_name(), "Overviews built");
    }

    promote_partial(&output)?;
    info!(path = %output.display(), "COG conversion complete");
    Ok(output)
}

fn write_base_image<T: GdalType + Copy>(
    src: &Dataset,
    tmp_str: &str,
    width: usize,
    height: usize,
    band_count: isize,
    options: &[RasterCreationOption],
) -> Result<(), GdalError> {
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut dst = driver.create_with_band_type_with_options::<T, _>(
        tmp_str,
        width as isize,
        height as isize,
        band_count,
        options,
    )?;

    let projection = src.projection();
    if !projection.is_empty() {
        dst.set_projection(&projection)?;
    }
    if let Ok(transform) = src.geo_transform() {
        dst.set_geo_transform(&transform)?;
    }

    for i in 1..=band_count {
        let src_band = src.rasterband(i)?;
        let buffer = src_band.read_as::<T>((0, 0), (width, height), (width, height), None)?;
        let mut dst_band = dst.rasterband(i)?;
        if let Some(nodata) = src_band.no_data_value() {
            dst_band.set_no_data_value(Some(nodata))?;
        }
        dst_band.write((0, 0), (width, height), &buffer)?;
    }
    Ok(())
}

fn conversion_err(e: GdalError) -> PipelineError {
    PipelineError::Conversion(e.to_string())
}
