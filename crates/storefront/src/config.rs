//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required when `DABOT_DATA_SOURCE=remote`
//! - `DABOT_DATA_ENDPOINT` - GraphQL endpoint of the data API
//! - `DABOT_DATA_API_KEY` - Data API key (high entropy, sent as `x-api-key`)
//!
//! ## Optional
//! - `DABOT_HOST` - Bind address (default: 127.0.0.1)
//! - `DABOT_PORT` - Listen port (default: 3000)
//! - `DABOT_BASE_URL` - Public URL for the site (default: <http://localhost:3000>)
//! - `DABOT_DATA_SOURCE` - `static` (bundled fixture, default) or `remote`
//! - `DABOT_SEARCH_STRATEGY` - `local` (default) or `remote` (push exact filters to the backend)
//! - `DABOT_CACHE_TTL_SECS` - Remote listing cache TTL (default: 300)
//! - `DABOT_TRUST_PROXY_HEADERS` - Key the API rate limit on `X-Forwarded-For`/`X-Real-IP`
//!   instead of the peer address (default: false; enable only behind a proxy)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Where store records come from
    pub data: DataSourceConfig,
    /// How store searches are executed
    pub search_strategy: SearchStrategy,
    /// Whether client IPs are taken from proxy headers
    pub trust_proxy_headers: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Store record source.
#[derive(Debug, Clone, Default)]
pub enum DataSourceConfig {
    /// Bundled fixture compiled into the binary.
    #[default]
    Static,
    /// Remote GraphQL data API.
    Remote(RemoteDataConfig),
}

/// Remote data API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct RemoteDataConfig {
    /// GraphQL endpoint URL
    pub endpoint: Url,
    /// API key sent in the `x-api-key` header
    pub api_key: SecretString,
    /// How long full listings stay cached
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for RemoteDataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDataConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[REDACTED]")
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// Where store search filters are evaluated.
///
/// Both strategies return identical results; `Remote` only narrows the
/// records fetched from the backend before the local engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Fetch every record and filter in process.
    #[default]
    Local,
    /// Push exact-match filters (area, prefecture) down to the backend.
    Remote,
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(format!("expected 'local' or 'remote', got '{other}'")),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("DABOT_HOST", "127.0.0.1")?;
        let port = parse_env("DABOT_PORT", "3000")?;
        let base_url = get_env_or_default("DABOT_BASE_URL", "http://localhost:3000");
        parse_url("DABOT_BASE_URL", &base_url)?;
        let data = DataSourceConfig::from_env()?;
        let search_strategy = parse_env("DABOT_SEARCH_STRATEGY", "local")?;
        let trust_proxy_headers = parse_env("DABOT_TRUST_PROXY_HEADERS", "false")?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_env("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            host,
            port,
            base_url,
            data,
            search_strategy,
            trust_proxy_headers,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Configuration for local development and tests: bundled fixture,
    /// local search, no Sentry.
    #[must_use]
    pub fn local() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            data: DataSourceConfig::Static,
            search_strategy: SearchStrategy::Local,
            trust_proxy_headers: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DataSourceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let source = get_env_or_default("DABOT_DATA_SOURCE", "static");
        match source.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "remote" => Ok(Self::Remote(RemoteDataConfig::from_env()?)),
            other => Err(ConfigError::InvalidEnvVar(
                "DABOT_DATA_SOURCE".to_string(),
                format!("expected 'static' or 'remote', got '{other}'"),
            )),
        }
    }
}

impl RemoteDataConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let endpoint = get_required_env("DABOT_DATA_ENDPOINT")?;
        let endpoint = parse_url("DABOT_DATA_ENDPOINT", &endpoint)?;
        let api_key = get_validated_secret("DABOT_DATA_API_KEY")?;
        let ttl_secs: u64 = parse_env("DABOT_CACHE_TTL_SECS", "300")?;

        Ok(Self {
            endpoint,
            api_key,
            cache_ttl: Duration::from_secs(ttl_secs),
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

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an absolute http(s) URL.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
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

    // Real API keys are random and have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= \
                 {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the data API."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
