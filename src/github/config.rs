use crate::{Error, Result};
use std::env;

const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub integration configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Personal access token sent as a bearer token
    pub token: String,

    /// Account whose repositories are served
    pub username: String,

    /// REST/GraphQL base URL, overridable for GitHub Enterprise or tests
    pub api_url: String,

    /// Page size for the repository listing (single page only)
    pub per_page: u32,

    /// Number of pinned items requested from GraphQL
    pub pinned_limit: u32,

    /// Warn once remaining rate-limit quota drops to this value
    pub rate_limit_warn_threshold: u32,
}

impl GitHubConfig {
    /// Create a new GitHubConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let token = env::var("GITHUB_TOKEN").unwrap_or_default();
        let username = env::var("GITHUB_USERNAME").unwrap_or_default();
        let api_url = env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let rate_limit_warn_threshold = env::var("GITHUB_RATE_LIMIT_WARN")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid GITHUB_RATE_LIMIT_WARN value".to_string()))?;

        Ok(Self {
            token,
            username,
            api_url,
            rate_limit_warn_threshold,
            ..Self::default()
        })
    }

    /// Get the base API URL without a trailing slash
    pub fn api_base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::Config("GITHUB_TOKEN must be set".to_string()));
        }

        if self.username.trim().is_empty() {
            return Err(Error::Config("GITHUB_USERNAME must be set".to_string()));
        }

        let url = url::Url::parse(&self.api_url)
            .map_err(|e| Error::Config(format!("Invalid GITHUB_API_URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(
                "GITHUB_API_URL must use http or https".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            username: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            per_page: 100,
            pinned_limit: 6,
            rate_limit_warn_threshold: 100,
        }
    }
}
