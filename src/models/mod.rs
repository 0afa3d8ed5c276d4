pub mod attendance;
pub mod broadcast;
pub mod form;
pub mod grievance;
pub mod leaderboard;
pub mod learning;
pub mod notification;
pub mod role;
pub mod sos;
pub mod stock;
pub mod user;
pub mod visit;
pub mod zone;
