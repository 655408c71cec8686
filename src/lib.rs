pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod utils;
pub mod views;
