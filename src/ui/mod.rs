pub mod envelope;
pub mod messages;
