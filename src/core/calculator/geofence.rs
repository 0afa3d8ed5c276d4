//! Great-circle distance and geofence membership.

use crate::errors::{AppError, AppResult};
use serde::Serialize;
use serde_json::json;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Validated constructor: latitude in [-90, 90], longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        let mut errors = Vec::new();
        if !(-90.0..=90.0).contains(&latitude) {
            errors.push(json!({ "field": "latitude", "message": "must be between -90 and 90" }));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            errors.push(json!({ "field": "longitude", "message": "must be between -180 and 180" }));
        }
        if !errors.is_empty() {
            return Err(AppError::validation_with("Validation failed", json!(errors)));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FenceCheck {
    pub distance_m: i64,
    pub within_fence: bool,
}

/// Haversine distance between two points, in metres.
pub fn haversine_distance(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Check `point` against a fence of `radius_m` metres around `center`.
/// Membership uses the exact distance; the reported distance is rounded.
pub fn evaluate(point: Coordinates, center: Coordinates, radius_m: i64) -> FenceCheck {
    let distance = haversine_distance(point, center);
    FenceCheck {
        distance_m: distance.round() as i64,
        within_fence: distance <= radius_m as f64,
    }
}
