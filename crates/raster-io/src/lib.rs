//! GDAL-backed raster I/O for the pipeline.
//!
//! Three concerns: reading a single band into memory with its spatial
//! profile, writing a single-band float32 GeoTIFF, and repackaging a GeoTIFF
//! as a Cloud-Optimized GeoTIFF (tiled, compressed, with overviews).

pub mod band;
pub mod cog;
pub mod geotiff;

pub use band::{gdal_path, read_band, BandData, RasterProfile};
pub use cog::{clamp_overview_levels, cog_output_path, convert_to_cog};
pub use geotiff::write_float32_geotiff;
