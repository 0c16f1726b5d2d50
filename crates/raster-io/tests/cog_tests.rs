//! COG conversion tests on synthetic rasters.

use std::path::PathBuf;

use pipeline_common::{CogConfig, Compression};
use raster_io::{convert_to_cog, read_band, write_float32_geotiff, RasterProfile};

fn test_config() -> CogConfig {
    // Deflate keeps the tests independent of the local GDAL's ZSTD support;
    // the shipped default stays ZSTD.
    CogConfig {
        compression: Compression::Deflate,
        ..CogConfig::default()
    }
}

fn write_synthetic(dir: &std::path::Path, name: &str, width: usize, height: usize) -> PathBuf {
    let path = dir.join(name);
    let data: Vec<f32> = (0..width * height)
        .map(|i| ((i % 997) as f32 / 997.0) * 2.0 - 1.0)
        .collect();
    let profile = RasterProfile {
        projection: String::new(),
        geo_transform: Some([34.55, 0.0001, 0.0, 31.85, 0.0, -0.0001]),
        nodata: None,
    };
    write_float32_geotiff(&path, width, height, data, &profile).unwrap();
    path
}

#[test]
fn converts_500x500_with_full_overview_stack() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_synthetic(dir.path(), "ndvi_S2A_T1.tif", 500, 500);

    let output = convert_to_cog(&input, &test_config()).unwrap();
    assert_eq!(
        output.file_name().unwrap().to_str().unwrap(),
        "ndvi_S2A_T1_cog.tif"
    );
    assert!(output.exists());

    let dataset = gdal::Dataset::open(&output).unwrap();
    assert_eq!(dataset.raster_count(), 1);

    let band = dataset.rasterband(1).unwrap();
    assert_eq!(band.block_size(), (512, 512));
    // All five factors fit a 500-pixel image.
    assert_eq!(band.overview_count().unwrap(), 5);
}

#[test]
fn pixel_values_survive_lossless_repackaging() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_synthetic(dir.path(), "ndvi_small.tif", 64, 64);

    let output = convert_to_cog(&input, &test_config()).unwrap();

    let before = read_band(input.to_str().unwrap()).unwrap();
    let after = read_band(output.to_str().unwrap()).unwrap();
    assert_eq!(before.shape(), after.shape());
    assert_eq!(before.data, after.data);
    assert_eq!(before.profile.geo_transform, after.profile.geo_transform);
}

#[test]
fn overview_levels_clamped_for_tiny_images() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_synthetic(dir.path(), "tiny.tif", 8, 8);

    let output = convert_to_cog(&input, &test_config()).unwrap();
    let dataset = gdal::Dataset::open(&output).unwrap();
    let band = dataset.rasterband(1).unwrap();
    // Only factors 2, 4, 8 fit an 8-pixel image.
    assert_eq!(band.overview_count().unwrap(), 3);
}

#[test]
fn rerun_overwrites_previous_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_synthetic(dir.path(), "ndvi_rerun.tif", 32, 32);

    let first = convert_to_cog(&input, &test_config()).unwrap();
    let second = convert_to_cog(&input, &test_config()).unwrap();
    assert_eq!(first, second);

    let after = read_band(second.to_str().unwrap()).unwrap();
    assert_eq!(after.shape(), (32, 32));
}

#[test]
fn custom_blocksize_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_synthetic(dir.path(), "blocks.tif", 600, 600);

    let config = CogConfig {
        blocksize: 256,
        compression: Compression::Deflate,
        ..CogConfig::default()
    };
    let output = convert_to_cog(&input, &config).unwrap();

    let dataset = gdal::Dataset::open(&output).unwrap();
    let band = dataset.rasterband(1).unwrap();
    assert_eq!(band.block_size(), (256, 256));
}
