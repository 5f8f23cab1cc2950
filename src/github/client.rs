use crate::github::{
    config::GitHubConfig,
    models::{
        ApiErrorBody, AuthenticatedUser, GraphQlRequest, GraphQlResponse, PinnedData,
        RateLimit, RateLimitResponse, RestRepository,
    },
    rate_limit::RateLimitTracker,
};
use crate::models::Repository;
use crate::{Error, Result};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, error, info};

const PINNED_QUERY: &str = r#"
query($login: String!, $first: Int!) {
  user(login: $login) {
    pinnedItems(first: $first, types: REPOSITORY) {
      nodes {
        ... on Repository {
          databaseId
          name
          nameWithOwner
          description
          url
          homepageUrl
          primaryLanguage { name }
          stargazerCount
          forkCount
          isFork
          isPrivate
          isArchived
          createdAt
          updatedAt
          pushedAt
          repositoryTopics(first: 20) { nodes { topic { name } } }
        }
      }
    }
  }
}
"#;

/// GitHub API client
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    config: GitHubConfig,
    rate_limit: RateLimitTracker,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&format!("Showcase/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|e| Error::Internal(format!("Invalid user agent: {e}")))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let auth_value = format!("Bearer {}", config.token);
        let mut auth = header::HeaderValue::from_str(&auth_value)
            .map_err(|_| Error::Config("GITHUB_TOKEN contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        // No explicit timeout: requests run to completion or transport failure
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        let rate_limit = RateLimitTracker::new(config.rate_limit_warn_threshold);

        Ok(Self {
            client,
            config,
            rate_limit,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url(), path)
    }

    /// Send a request and turn non-success statuses into errors
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;

        self.rate_limit
            .update_from_headers(response.headers())
            .await;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        error!("GitHub API error: {} - {}", status, body);

        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Unexpected response")
                    .to_string()
            });

        Err(Error::upstream(Some(status.as_u16()), message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| {
            Error::upstream(
                Some(status),
                format!("Failed to parse GitHub API response: {e}"),
            )
        })
    }

    /// Make a GET request to GitHub API
    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("GitHub API request: GET {}", url);

        let response = self.send(self.client.get(&url).query(query)).await?;
        Self::decode(response).await
    }

    /// List repositories owned by `username`, first page only
    pub async fn fetch_repositories(&self, username: &str) -> Result<Vec<Repository>> {
        self.fetch_repository_page(username, self.config.per_page)
            .await
    }

    /// List up to `per_page` repositories owned by `username`, most recently updated first
    pub async fn fetch_repository_page(
        &self,
        username: &str,
        per_page: u32,
    ) -> Result<Vec<Repository>> {
        let path = format!("/users/{}/repos", urlencoding::encode(username));
        let query = [
            ("type", "owner".to_string()),
            ("sort", "updated".to_string()),
            ("direction", "desc".to_string()),
            ("per_page", per_page.to_string()),
        ];

        let repos: Vec<RestRepository> = self.get(&path, &query).await?;
        info!("Fetched {} repositories for {}", repos.len(), username);

        Ok(repos.into_iter().map(Repository::from).collect())
    }

    /// Repositories `username` pinned on their profile, in profile order
    pub async fn fetch_pinned_repositories(&self, username: &str) -> Result<Vec<Repository>> {
        let url = self.url("/graphql");
        debug!("GitHub API request: POST {} (pinned items)", url);

        let request = GraphQlRequest {
            query: PINNED_QUERY,
            variables: json!({
                "login": username,
                "first": self.config.pinned_limit,
            }),
        };

        let response = self.send(self.client.post(&url).json(&request)).await?;
        let body: GraphQlResponse<PinnedData> = Self::decode(response).await?;

        let user = body.data.and_then(|d| d.user);
        let not_found = body
            .errors
            .iter()
            .any(|e| e.error_type.as_deref() == Some("NOT_FOUND"));

        let user = match user {
            Some(user) if body.errors.is_empty() => user,
            None if not_found || body.errors.is_empty() => {
                return Err(Error::NotFound(format!("GitHub user {username} not found")));
            }
            _ => {
                let message = body
                    .errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                error!("GitHub GraphQL error: {}", message);
                return Err(Error::upstream(None, message));
            }
        };

        let repos: Vec<Repository> = user
            .pinned_items
            .nodes
            .into_iter()
            .map(Repository::from)
            .collect();
        info!("Fetched {} pinned repositories for {}", repos.len(), username);

        Ok(repos)
    }

    /// Byte counts per language for `full_name` (`owner/repo`)
    pub async fn fetch_languages(&self, full_name: &str) -> Result<BTreeMap<String, u64>> {
        let path = format!("/repos/{full_name}/languages");

        match self.get(&path, &[]).await {
            Err(Error::Upstream {
                status: Some(status),
                ..
            }) if status == StatusCode::NOT_FOUND.as_u16() => Err(Error::NotFound(format!(
                "Repository {full_name} not found"
            ))),
            other => other,
        }
    }

    /// The account the configured token authenticates as, with its scopes
    pub async fn authenticated_user(&self) -> Result<AuthenticatedUser> {
        let url = self.url("/user");
        debug!("GitHub API request: GET {}", url);

        let response = self.send(self.client.get(&url)).await?;
        let scopes = response
            .headers()
            .get("x-oauth-scopes")
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            });

        let mut user: AuthenticatedUser = Self::decode(response).await?;
        user.scopes = scopes;
        Ok(user)
    }

    /// Core REST quota as reported by `GET /rate_limit`
    pub async fn core_rate_limit(&self) -> Result<RateLimit> {
        let response: RateLimitResponse = self.get("/rate_limit", &[]).await?;
        Ok(response.resources.core)
    }
}
