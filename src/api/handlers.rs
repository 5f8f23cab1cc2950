use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::Uri,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    api::{models::*, params::*},
    cache::{Cached, Clock, RepositoryCache, PINNED_KEY, REPOSITORIES_KEY},
    config::Settings,
    github::{parse_repository_name, GitHubClient},
    models::Repository,
    query::{self, RankWeights},
    Error, Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub github: GitHubClient,
    pub cache: Arc<RepositoryCache>,
    pub clock: Arc<dyn Clock>,
    pub weights: RankWeights,
}

impl AppState {
    pub fn new(settings: Settings, clock: Arc<dyn Clock>) -> Result<Self> {
        let github = GitHubClient::new(settings.github.clone())?;
        let cache = Arc::new(RepositoryCache::new(settings.cache.ttl(), clock.clone()));

        Ok(Self {
            settings,
            github,
            cache,
            clock,
            weights: RankWeights::default(),
        })
    }

    fn username(&self) -> &str {
        &self.settings.github.username
    }

    /// The owner's full, unfiltered repository listing
    async fn repositories(&self, force_refresh: bool) -> Result<Cached<Arc<Vec<Repository>>>> {
        let github = &self.github;
        let username = self.username();
        self.cache
            .get_or_fetch(REPOSITORIES_KEY, force_refresh, || async move {
                github.fetch_repositories(username).await.map(Arc::new)
            })
            .await
    }

    async fn pinned(&self, force_refresh: bool) -> Result<Cached<Arc<Vec<Repository>>>> {
        let github = &self.github;
        let username = self.username();
        self.cache
            .get_or_fetch(PINNED_KEY, force_refresh, || async move {
                github.fetch_pinned_repositories(username).await.map(Arc::new)
            })
            .await
    }
}

/// GET / - Health check
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        github_username: state.settings.github.username.clone(),
        cache_ttl_minutes: state.cache.ttl().as_secs() / 60,
    })
}

/// GET /api/repositories - Filtered, sorted repository listing
pub async fn list_repositories(
    State(state): State<AppState>,
    params: std::result::Result<Query<RepositoryParams>, QueryRejection>,
) -> Result<Json<RepositoriesResponse>> {
    let Query(params) = params?;
    debug!("List repositories request: {:?}", params);

    // Validate everything before any upstream traffic
    let options = params.query_options()?;
    let force_refresh = params.force_refresh()?;

    let listing = state.repositories(force_refresh).await?;
    let repositories = query::apply(&listing.value, &options);

    Ok(Json(RepositoriesResponse {
        count: repositories.len(),
        repositories,
        cached: listing.from_cache,
        last_updated: listing.fetched_at.to_rfc3339(),
    }))
}

/// GET /api/pinned - Repositories pinned on the owner's profile
pub async fn list_pinned(
    State(state): State<AppState>,
    params: std::result::Result<Query<RefreshParams>, QueryRejection>,
) -> Result<Json<PinnedResponse>> {
    let Query(params) = params?;
    debug!("List pinned request: {:?}", params);

    let force_refresh = params.force_refresh()?;
    let pinned = state.pinned(force_refresh).await?;
    let pinned_repositories = pinned.value.as_ref().clone();

    Ok(Json(PinnedResponse {
        count: pinned_repositories.len(),
        pinned_repositories,
    }))
}

/// GET /api/featured - Top repositories by stars, forks and recent activity
pub async fn list_featured(
    State(state): State<AppState>,
    params: std::result::Result<Query<FeaturedParams>, QueryRejection>,
) -> Result<Json<FeaturedResponse>> {
    let Query(params) = params?;
    debug!("List featured request: {:?}", params);

    let limit = params.limit()?;
    let force_refresh = params.force_refresh()?;

    let listing = state.repositories(force_refresh).await?;
    let featured = query::rank(&listing.value, limit, state.clock.now(), &state.weights);

    Ok(Json(FeaturedResponse {
        count: featured.len(),
        featured_repositories: featured,
    }))
}

/// GET /api/repositories/:repo_name/languages - Language byte counts
pub async fn repository_languages(
    State(state): State<AppState>,
    repo_name: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<LanguagesResponse>> {
    let Path(repo_name) = repo_name?;
    debug!("Repository languages request: {}", repo_name);

    let info = parse_repository_name(&repo_name, state.username())?;
    let languages = state.github.fetch_languages(&info.full_name()).await?;

    Ok(Json(LanguagesResponse {
        repository: repo_name,
        languages,
    }))
}

/// Any unmatched route
pub async fn not_found(uri: Uri) -> Error {
    Error::NotFound(format!("No route for {}", uri.path()))
}
