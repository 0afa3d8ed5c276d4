pub mod colors;
pub mod date;
pub mod pagination;
pub mod path;
pub mod time;
