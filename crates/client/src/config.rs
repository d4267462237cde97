//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VERDANT_API_URL` - Base URL of the storefront backend
//!
//! ## Optional
//! - `VERDANT_API_TOKEN` - Bearer token attached to every request
//! - `VERDANT_SESSION_FILE` - Where the session identity is persisted
//!   (default: `.verdant-session`)
//! - `VERDANT_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `VERDANT_CATALOG_CACHE_SECS` - Catalog read cache TTL (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_SESSION_FILE: &str = ".verdant-session";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CATALOG_CACHE_SECS: u64 = 300;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the storefront backend (e.g., `https://api.verdantmarket.dev`)
    pub api_url: Url,
    /// Optional bearer token sent with every request
    pub api_token: Option<SecretString>,
    /// File the session identity is persisted to
    pub session_file: PathBuf,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// TTL for cached catalog reads (products, categories)
    pub catalog_cache_ttl: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("session_file", &self.session_file)
            .field("request_timeout", &self.request_timeout)
            .field("catalog_cache_ttl", &self.catalog_cache_ttl)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_required_env("VERDANT_API_URL")?)?;

        let api_token = match get_optional_env("VERDANT_API_TOKEN") {
            Some(token) => {
                validate_secret_strength(&token, "VERDANT_API_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        let session_file =
            PathBuf::from(get_env_or_default("VERDANT_SESSION_FILE", DEFAULT_SESSION_FILE));

        let request_timeout = Duration::from_secs(parse_secs(
            "VERDANT_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let catalog_cache_ttl = Duration::from_secs(parse_secs(
            "VERDANT_CATALOG_CACHE_SECS",
            DEFAULT_CATALOG_CACHE_SECS,
        )?);

        Ok(Self {
            api_url,
            api_token,
            session_file,
            request_timeout,
            catalog_cache_ttl,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a seconds value with a default.
fn parse_secs(key: &str, default: u64) -> Result<u64, ConfigError> {
    get_env_or_default(key, &default.to_string())
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse and validate the backend base URL.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("VERDANT_API_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "VERDANT_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "VERDANT_API_URL".to_string(),
            "missing host".to_string(),
        ));
    }

    Ok(url)
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}
