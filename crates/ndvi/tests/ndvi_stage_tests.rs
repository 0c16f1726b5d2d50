//! End-to-end NDVI stage tests on synthetic descriptors and bands.

use std::path::Path;

use ndvi::run_ndvi_stage;
use pipeline_common::{BandAssets, SceneDescriptor};
use raster_io::{read_band, write_float32_geotiff, RasterProfile};

fn write_band(dir: &Path, name: &str, width: usize, height: usize, data: Vec<f32>) -> String {
    let path = dir.join(name);
    let profile = RasterProfile {
        projection: String::new(),
        geo_transform: Some([34.55, 0.0001, 0.0, 31.85, 0.0, -0.0001]),
        nodata: None,
    };
    write_float32_geotiff(&path, width, height, data, &profile).unwrap();
    path.to_str().unwrap().to_string()
}

fn write_descriptor(dir: &Path, item_id: &str, red: &str, nir: &str) -> std::path::PathBuf {
    let descriptor = SceneDescriptor {
        item_id: Some(item_id.to_string()),
        item_datetime: Some("2025-06-07T08:16:21Z".to_string()),
        assets: BandAssets {
            red: Some(red.to_string()),
            nir: Some(nir.to_string()),
            scl: None,
        },
    };
    let path = dir.join(SceneDescriptor::filename_for(item_id));
    descriptor.save(&path).unwrap();
    path
}

#[test]
fn uniform_bands_yield_uniform_index() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_band(dir.path(), "r.tif", 2, 2, vec![100.0; 4]);
    let nir = write_band(dir.path(), "n.tif", 2, 2, vec![300.0; 4]);
    let descriptor = write_descriptor(dir.path(), "S2A_T1", &red, &nir);

    let output = run_ndvi_stage(&descriptor, dir.path()).unwrap();
    assert_eq!(
        output.file_name().unwrap().to_str().unwrap(),
        "ndvi_S2A_T1.tif"
    );

    let band = read_band(output.to_str().unwrap()).unwrap();
    assert_eq!(band.shape(), (2, 2));
    assert_eq!(band.data, vec![0.5; 4]);

    // Single float32 band, whatever the inputs were.
    let dataset = gdal::Dataset::open(&output).unwrap();
    assert_eq!(dataset.raster_count(), 1);
    assert_eq!(
        dataset.rasterband(1).unwrap().band_type(),
        gdal::raster::GdalDataType::Float32
    );
}

#[test]
fn all_zero_bands_yield_zero_not_nan() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_band(dir.path(), "r.tif", 2, 2, vec![0.0; 4]);
    let nir = write_band(dir.path(), "n.tif", 2, 2, vec![0.0; 4]);
    let descriptor = write_descriptor(dir.path(), "S2A_zero", &red, &nir);

    let output = run_ndvi_stage(&descriptor, dir.path()).unwrap();
    let band = read_band(output.to_str().unwrap()).unwrap();
    assert_eq!(band.data, vec![0.0; 4]);
    assert!(band.data.iter().all(|v| !v.is_nan()));
}

#[test]
fn output_inherits_red_band_profile() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_band(dir.path(), "r.tif", 4, 4, vec![100.0; 16]);
    let nir = write_band(dir.path(), "n.tif", 4, 4, vec![300.0; 16]);
    let descriptor = write_descriptor(dir.path(), "S2A_geo", &red, &nir);

    let output = run_ndvi_stage(&descriptor, dir.path()).unwrap();
    let band = read_band(output.to_str().unwrap()).unwrap();
    assert_eq!(
        band.profile.geo_transform,
        Some([34.55, 0.0001, 0.0, 31.85, 0.0, -0.0001])
    );
}

#[test]
fn shape_mismatch_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_band(dir.path(), "r.tif", 2, 2, vec![100.0; 4]);
    let nir = write_band(dir.path(), "n.tif", 3, 3, vec![300.0; 9]);
    let descriptor = write_descriptor(dir.path(), "S2A_bad", &red, &nir);

    let err = run_ndvi_stage(&descriptor, dir.path()).unwrap_err();
    assert_eq!(err.kind(), "ShapeMismatch");
    assert!(!dir.path().join("ndvi_S2A_bad.tif").exists());
}

#[test]
fn unreadable_band_is_band_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_band(dir.path(), "r.tif", 2, 2, vec![100.0; 4]);
    let descriptor = write_descriptor(dir.path(), "S2A_missing", &red, "/nonexistent/n.tif");

    let err = run_ndvi_stage(&descriptor, dir.path()).unwrap_err();
    assert_eq!(err.kind(), "BandReadError");
}

#[test]
fn descriptor_without_nir_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken_bands.json");
    std::fs::write(
        &path,
        r#"{"item_id": "S2A_T1", "assets": {"red": "r.tif", "nir": null, "scl": null}}"#,
    )
    .unwrap();

    let err = run_ndvi_stage(&path, dir.path()).unwrap_err();
    assert_eq!(err.kind(), "DescriptorInvalid");
}

#[test]
fn missing_item_id_falls_back_to_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let red = write_band(dir.path(), "r.tif", 2, 2, vec![100.0; 4]);
    let nir = write_band(dir.path(), "n.tif", 2, 2, vec![300.0; 4]);
    let path = dir.path().join("anon_bands.json");
    std::fs::write(
        &path,
        format!(r#"{{"assets": {{"red": "{red}", "nir": "{nir}", "scl": null}}}}"#),
    )
    .unwrap();

    let output = run_ndvi_stage(&path, dir.path()).unwrap();
    assert_eq!(
        output.file_name().unwrap().to_str().unwrap(),
        "ndvi_unknown_item.tif"
    );
}
