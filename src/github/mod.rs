pub mod client;
pub mod config;
pub mod models;
pub mod parser;
pub mod rate_limit;

pub use client::GitHubClient;
pub use config::GitHubConfig;
pub use parser::{parse_repository_name, RepositoryInfo};
pub use rate_limit::RateLimitTracker;
