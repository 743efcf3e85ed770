pub mod aggregate;
pub mod config;
pub mod credits;
pub mod description;
pub mod error;
pub mod models;
pub mod storage;
