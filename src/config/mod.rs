use crate::error::{Error, Result};
use crate::github::GitHubConfig;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    pub github: GitHubConfig,
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub environment: Environment,
    pub debug: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second allowed per client IP on /api
    pub api_rate_limit: u64,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl_minutes: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes * 60)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_minutes: 30 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::Config(format!("Unknown ENVIRONMENT value: {other}"))),
        }
    }
}

/// Parse a boolean flag the way query parameters are parsed
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let github = GitHubConfig::from_env()?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "5001".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PORT value".to_string()))?;

        let api_rate_limit = std::env::var("API_RATE_LIMIT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid API_RATE_LIMIT value".to_string()))?;

        let max_request_body_size = std::env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| "65536".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_REQUEST_BODY_SIZE value".to_string()))?;

        let ttl_minutes = std::env::var("CACHE_TTL_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid CACHE_TTL_MINUTES value".to_string()))?;

        let environment = match std::env::var("ENVIRONMENT") {
            Ok(value) => value.parse()?,
            Err(_) => Environment::default(),
        };

        let debug = match std::env::var("DEBUG") {
            Ok(value) => parse_flag(&value)
                .ok_or_else(|| Error::Config("Invalid DEBUG value".to_string()))?,
            Err(_) => false,
        };

        Ok(Settings {
            github,
            server: ServerConfig {
                host,
                port,
                api_rate_limit,
                max_request_body_size,
            },
            cache: CacheConfig { ttl_minutes },
            environment,
            debug,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if self.cache.ttl_minutes == 0 {
            return Err(Error::Config("Cache TTL must be non-zero".to_string()));
        }

        self.github.validate()
    }

    /// Default tracing filter when RUST_LOG is not set
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "info,showcase=debug"
        } else {
            "info,showcase=info"
        }
    }
}
