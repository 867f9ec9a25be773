use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use validator::Validate;

/// Immutable containment predicate over geographic coordinates.
///
/// Implementations must be infallible: a point is either inside or not.
pub trait GeographicRegion: Debug + Send + Sync {
    fn contains(&self, longitude: f64, latitude: f64) -> bool;
}

/// Longitude/latitude box, boundary-inclusive.
///
/// A box with `lon_min > lon_max` wraps across the antimeridian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BoundingBox {
    #[serde(default)]
    pub description: Option<String>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon_min: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon_max: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub lat_min: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub lat_max: f64,
}

impl BoundingBox {
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            description: None,
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.lon_min > self.lon_max
    }
}

impl GeographicRegion for BoundingBox {
    fn contains(&self, longitude: f64, latitude: f64) -> bool {
        if !(self.lat_min..=self.lat_max).contains(&latitude) {
            return false;
        }

        if self.crosses_antimeridian() {
            longitude >= self.lon_min || longitude <= self.lon_max
        } else {
            (self.lon_min..=self.lon_max).contains(&longitude)
        }
    }
}
