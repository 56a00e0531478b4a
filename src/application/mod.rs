pub mod error;
pub mod list;
pub mod repos;
