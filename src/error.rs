use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The provider answered with a non-success status or an unusable body
    #[error("GitHub API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Upstream {
            status,
            message: message.into(),
        }
    }

    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Upstream { .. } | Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // reqwest errors carry the full request URL
            Error::Http(e) if e.is_timeout() => "GitHub request timed out".to_string(),
            Error::Http(_) => "GitHub request failed".to_string(),

            Error::Internal(msg) | Error::Config(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("token") || lower.contains("secret") || lower.contains("key") {
                    "Internal error (details redacted)".to_string()
                } else {
                    self.to_string()
                }
            }

            Error::Io(_) => "File system operation failed".to_string(),

            Error::Upstream { .. } | Error::NotFound(_) | Error::InvalidParameter(_) => {
                self.to_string()
            }
        }
    }

    /// Message returned to API callers
    fn public_message(&self) -> String {
        match self {
            Error::Upstream { .. } => self.to_string(),
            Error::Http(_) => "Failed to reach GitHub".to_string(),
            Error::NotFound(msg) | Error::InvalidParameter(msg) => msg.clone(),
            _ => "Internal server error".to_string(),
        }
    }
}

// Extractor rejections are reported as JSON like every other error
impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidParameter(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidParameter(rejection.body_text())
    }
}

// Implement IntoResponse for API error handling
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request error: {}", self.log_safe());
        } else {
            tracing::debug!("Request rejected: {}", self.log_safe());
        }

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::upstream(Some(403), "rate limited").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::NotFound("repo".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::InvalidParameter("sort".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Config("bad".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_display_includes_status() {
        let err = Error::upstream(Some(403), "API rate limit exceeded");
        assert_eq!(err.to_string(), "GitHub API error (403): API rate limit exceeded");

        let err = Error::upstream(None, "GraphQL query failed");
        assert_eq!(err.to_string(), "GitHub API error: GraphQL query failed");
    }

    #[test]
    fn test_log_safe_redacts_tokens() {
        let err = Error::Internal("invalid token ghp_abc".to_string());
        assert_eq!(err.log_safe(), "Internal error (details redacted)");

        let err = Error::Internal("cache poisoned".to_string());
        assert_eq!(err.log_safe(), "Internal error: cache poisoned");
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = Error::Internal("lock poisoned at cache.rs".to_string());
        assert_eq!(err.public_message(), "Internal server error");
    }
}
