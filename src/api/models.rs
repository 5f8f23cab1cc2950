use crate::models::Repository;
use serde::Serialize;
use std::collections::BTreeMap;

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub github_username: String,
    pub cache_ttl_minutes: u64,
}

/// GET /api/repositories response
#[derive(Debug, Clone, Serialize)]
pub struct RepositoriesResponse {
    pub count: usize,
    pub repositories: Vec<Repository>,
    /// Served without calling GitHub
    pub cached: bool,
    /// When the underlying listing was fetched (RFC 3339)
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PinnedResponse {
    pub count: usize,
    pub pinned_repositories: Vec<Repository>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeaturedResponse {
    pub count: usize,
    pub featured_repositories: Vec<Repository>,
}

/// Language breakdown for a single repository
#[derive(Debug, Clone, Serialize)]
pub struct LanguagesResponse {
    pub repository: String,
    pub languages: BTreeMap<String, u64>,
}
