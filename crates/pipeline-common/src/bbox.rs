//! Geographic bounding box for AOI definitions.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// A geographic bounding box in longitude/latitude degrees (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// The STAC wire order: [min_lon, min_lat, max_lon, max_lat].
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check that the box is well-formed and inside geographic bounds.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.min_lon >= self.max_lon || self.min_lat >= self.max_lat {
            return Err(PipelineError::InvalidConfig(format!(
                "degenerate bounding box: [{}, {}, {}, {}]",
                self.min_lon, self.min_lat, self.max_lon, self.max_lat
            )));
        }
        if self.min_lon < -180.0 || self.max_lon > 180.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "longitude out of range: [{}, {}]",
                self.min_lon, self.max_lon
            )));
        }
        if self.min_lat < -90.0 || self.max_lat > 90.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "latitude out of range: [{}, {}]",
                self.min_lat, self.max_lat
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_array_order() {
        let bbox = BoundingBox::new(34.55, 31.75, 34.75, 31.85);
        assert_eq!(bbox.to_array(), [34.55, 31.75, 34.75, 31.85]);
    }

    #[test]
    fn test_validate_ok() {
        assert!(BoundingBox::new(-180.0, -90.0, 180.0, 90.0).validate().is_ok());
        assert!(BoundingBox::new(34.55, 31.75, 34.75, 31.85).validate().is_ok());
    }

    #[test]
    fn test_validate_degenerate() {
        assert!(BoundingBox::new(10.0, 0.0, 10.0, 5.0).validate().is_err());
        assert!(BoundingBox::new(10.0, 5.0, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_validate_out_of_range() {
        assert!(BoundingBox::new(-200.0, 0.0, 0.0, 5.0).validate().is_err());
        assert!(BoundingBox::new(0.0, 0.0, 5.0, 95.0).validate().is_err());
    }

    #[test]
    fn test_dimensions() {
        let bbox = BoundingBox::new(34.55, 31.75, 34.75, 31.85);
        assert!((bbox.width() - 0.2).abs() < 1e-9);
        assert!((bbox.height() - 0.1).abs() < 1e-9);
    }
}
