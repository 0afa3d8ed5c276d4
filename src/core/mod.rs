pub mod analytics;
pub mod attendance;
pub mod auth;
pub mod broadcast;
pub mod calculator;
pub mod config;
pub mod forms;
pub mod grievance;
pub mod leaderboard;
pub mod learning;
pub mod log;
pub mod notifications;
pub mod provision;
pub mod sos;
pub mod stock;
pub mod storage;
pub mod users;
pub mod visibility;
pub mod visits;
pub mod zones;
