//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Anonymous key presented when no session token is available.
pub const DEFAULT_ANON_KEY: &str = "public-anon-key";

/// HTTP service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Externally visible base URL (used for report image links)
    pub public_url: String,
    /// Key clients present before they have a session
    pub public_anon_key: String,
    /// Shared secret for `/admin/*` routes
    pub admin_key: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            public_url: "http://localhost:8080".to_string(),
            public_anon_key: DEFAULT_ANON_KEY.to_string(),
            admin_key: "test_admin_key".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        Ok(Self {
            port,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            public_url: env::var("PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            public_anon_key: env::var("PUBLIC_ANON_KEY")
                .unwrap_or_else(|_| DEFAULT_ANON_KEY.to_string()),
            admin_key: env::var("ADMIN_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("ADMIN_KEY"))?,
        })
    }
}

/// Remote API facade configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the HTTP service (no trailing slash)
    pub base_url: String,
    /// Bearer credential used when there is no session token
    pub anon_key: String,
    /// Admin key for `list_all`/`clear`, if this client may use them
    pub admin_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            anon_key: DEFAULT_ANON_KEY.to_string(),
            admin_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Load from `ECOTRACK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let timeout_secs = match env::var("ECOTRACK_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("ECOTRACK_TIMEOUT_SECS"))?,
            Err(_) => 30,
        };

        Ok(Self {
            base_url: env::var("ECOTRACK_API_URL")
                .map_err(|_| ConfigError::Missing("ECOTRACK_API_URL"))?
                .trim_end_matches('/')
                .to_string(),
            anon_key: env::var("ECOTRACK_ANON_KEY")
                .unwrap_or_else(|_| DEFAULT_ANON_KEY.to_string()),
            admin_key: env::var("ECOTRACK_ADMIN_KEY").ok(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
