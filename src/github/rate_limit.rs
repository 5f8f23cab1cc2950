use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Tracks the GitHub rate-limit quota reported on each response.
///
/// Observation only: requests are never delayed or retried.
#[derive(Clone)]
pub struct RateLimitTracker {
    state: Arc<RwLock<RateLimitState>>,
    warn_threshold: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    /// Total rate limit
    pub limit: u32,

    /// Remaining requests
    pub remaining: u32,

    /// Unix timestamp when rate limit resets
    pub reset_at: i64,
}

impl RateLimitState {
    pub fn reset_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.reset_at, 0).unwrap_or_else(Utc::now)
    }
}

impl RateLimitTracker {
    pub fn new(warn_threshold: u32) -> Self {
        Self {
            state: Arc::new(RwLock::new(RateLimitState {
                limit: 5000, // Authenticated default
                remaining: 5000,
                reset_at: Utc::now().timestamp() + 3600,
            })),
            warn_threshold,
        }
    }

    /// Update rate limit from GitHub API response headers
    pub async fn update_from_headers(&self, headers: &HeaderMap) {
        let limit = header_value::<u32>(headers, "x-ratelimit-limit");
        let remaining = header_value::<u32>(headers, "x-ratelimit-remaining");
        let reset = header_value::<i64>(headers, "x-ratelimit-reset");

        if limit.is_none() && remaining.is_none() && reset.is_none() {
            return;
        }

        let mut state = self.state.write().await;

        if let Some(limit) = limit {
            state.limit = limit;
        }
        if let Some(remaining) = remaining {
            state.remaining = remaining;
        }
        if let Some(reset) = reset {
            state.reset_at = reset;
        }

        debug!(
            "Rate limit updated: {}/{} (resets at {})",
            state.remaining, state.limit, state.reset_at
        );

        if state.remaining <= self.warn_threshold {
            warn!(
                "GitHub rate limit running low: {}/{} remaining until {}",
                state.remaining,
                state.limit,
                state.reset_time()
            );
        }
    }

    #[cfg(test)]
    async fn status(&self) -> RateLimitState {
        *self.state.read().await
    }
}

fn header_value<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}
