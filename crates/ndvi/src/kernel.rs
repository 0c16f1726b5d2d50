//! Elementwise NDVI kernel.

use rayon::prelude::*;

/// Compute NDVI = (NIR - Red) / (NIR + Red) per pixel.
///
/// Two rules are part of the contract, not the backend:
/// - a pixel whose denominator is exactly zero yields 0.0, never NaN;
/// - all other outputs are clamped to [-1.0, 1.0].
///
/// The pass runs on the rayon thread pool; callers only rely on the formula
/// and the zero/clamp policy.
pub fn compute_ndvi(red: &[f32], nir: &[f32]) -> Vec<f32> {
    debug_assert_eq!(red.len(), nir.len());
    red.par_iter()
        .zip(nir.par_iter())
        .map(|(&r, &n)| {
            let denominator = n + r;
            if denominator == 0.0 {
                0.0
            } else {
                ((n - r) / denominator).clamp(-1.0, 1.0)
            }
        })
        .collect()
}
