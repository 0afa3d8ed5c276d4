pub mod allocation;
pub mod attendance;
pub mod geofence;
pub mod period;
