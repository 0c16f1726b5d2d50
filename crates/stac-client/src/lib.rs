//! Minimal STAC API client for scene discovery.
//!
//! Covers exactly what catalog search needs: a `POST {base}/search` with a
//! bbox, a trailing datetime window, descending datetime sort, and a result
//! cap, plus the band asset resolution policy for Sentinel-2 items. Transient
//! transport failures are retried with exponential backoff; catalog-side
//! rejections are not.

pub mod assets;
pub mod client;
pub mod models;

pub use assets::resolve_band_assets;
pub use client::StacClient;
pub use models::{Asset, Item, ItemCollection};
