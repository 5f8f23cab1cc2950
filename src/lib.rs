pub mod cache;
pub mod config;
pub mod error;
pub mod models;

// Upstream access
pub mod github;

// Filtering, sorting and featured ranking
pub mod query;

// HTTP surface
pub mod api;

pub mod cli;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use models::Repository;
