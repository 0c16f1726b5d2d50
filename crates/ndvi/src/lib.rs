//! NDVI index computation.
//!
//! The kernel is a pure elementwise pass; the stage module wires it to the
//! scene descriptor contract (load bands, check shapes, persist the result
//! as a single-band float32 GeoTIFF).

pub mod kernel;
pub mod stage;

pub use kernel::compute_ndvi;
pub use stage::run_ndvi_stage;
