pub mod analytics;
pub mod auth;
pub mod client;
pub mod config;
pub mod models;
pub mod presets;
pub mod report;
