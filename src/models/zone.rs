use crate::core::calculator::geofence::Coordinates;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Zone {
    pub id: i64,
    pub org_id: i64,
    pub name: String,
    pub city: Option<String>,
    pub meeting_lat: f64,
    pub meeting_lng: f64,
    pub meeting_address: Option<String>,
    pub geofence_radius: i64,
    pub is_active: bool,
}

impl Zone {
    pub fn meeting_point(&self) -> Coordinates {
        Coordinates {
            latitude: self.meeting_lat,
            longitude: self.meeting_lng,
        }
    }
}

/// Fields needed to create a zone.
#[derive(Debug, Clone)]
pub struct NewZone {
    pub org_id: i64,
    pub name: String,
    pub city: Option<String>,
    pub meeting_point: Coordinates,
    pub meeting_address: Option<String>,
    pub geofence_radius: i64,
}
