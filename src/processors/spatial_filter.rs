use std::sync::Arc;

use crate::models::GeographicRegion;

/// Point-containment check against an optional region.
#[derive(Debug, Clone, Default)]
pub struct SpatialFilter {
    region: Option<Arc<dyn GeographicRegion>>,
}

impl SpatialFilter {
    pub fn new(region: Option<Arc<dyn GeographicRegion>>) -> Self {
        Self { region }
    }

    /// Filter that keeps every point.
    pub fn unrestricted() -> Self {
        Self { region: None }
    }

    pub fn with_region<R: GeographicRegion + 'static>(region: R) -> Self {
        Self {
            region: Some(Arc::new(region)),
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.region.is_some()
    }

    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        match &self.region {
            Some(region) => region.contains(longitude, latitude),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundingBox;

    #[test]
    fn test_unrestricted_accepts_everything() {
        let filter = SpatialFilter::unrestricted();
        assert!(!filter.is_restricted());
        assert!(filter.contains(0.0, -90.0));
        assert!(filter.contains(f64::NAN, f64::NAN));
    }

    #[test]
    fn test_region_delegation() {
        let filter = SpatialFilter::with_region(BoundingBox::new(-10.0, 40.0, 35.0, 70.0));
        assert!(filter.is_restricted());
        assert!(filter.contains(25.0, 60.0));
        assert!(filter.contains(10.0, 42.0));
        assert!(!filter.contains(0.0, -60.0));
        assert!(!filter.contains(42.0, -42.0));
    }
}
