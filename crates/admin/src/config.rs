//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ROSTER_HOST` - Bind address (default: 127.0.0.1)
//! - `ROSTER_PORT` - Listen port (default: 3001)
//! - `ROSTER_API_URL` - Base URL the dashboard's API client talks to
//!   (default: this server, `http://{host}:{port}`)
//! - `ROSTER_SEED` - Load the demo records at startup (default: true)
//! - `ROSTER_ID_STRATEGY` - `sequential` or `uuid` (default: sequential)
//! - `ROSTER_CLIENT_TIMEOUT_SECS` - API client request timeout (default: 10)
//! - `ROSTER_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - 0.0 to 1.0 (default: 1.0)
//!
//! ## Optional (TLS)
//! - `ROSTER_TLS_CERT` - PEM-encoded certificate chain
//! - `ROSTER_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::store::IdStrategy;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3001";
const DEFAULT_CLIENT_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Base URL of the user API consumed by the dashboard
    pub api_url: Url,
    /// Whether to load the demo records at startup
    pub seed: bool,
    /// How the store assigns new ids
    pub id_strategy: IdStrategy,
    /// Request timeout for the API client
    pub client_timeout: Duration,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_lookup(env: &impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        match (env("ROSTER_TLS_CERT"), env("ROSTER_TLS_KEY")) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "ROSTER_TLS_*".to_string(),
                "Both ROSTER_TLS_CERT and ROSTER_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_var(&env, "ROSTER_HOST", DEFAULT_HOST)?;
        let port = parse_var(&env, "ROSTER_PORT", DEFAULT_PORT)?;
        let seed = parse_bool(&env, "ROSTER_SEED", true)?;
        let id_strategy = parse_var(&env, "ROSTER_ID_STRATEGY", "sequential")?;
        let timeout_secs: u64 = parse_var(
            &env,
            "ROSTER_CLIENT_TIMEOUT_SECS",
            DEFAULT_CLIENT_TIMEOUT_SECS,
        )?;
        let log_format = match env("ROSTER_LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "ROSTER_LOG_FORMAT".to_string(),
                    format!("expected \"text\" or \"json\", got {other:?}"),
                ));
            }
        };

        let api_url = match env("ROSTER_API_URL") {
            Some(raw) => Url::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("ROSTER_API_URL".to_string(), e.to_string())
            })?,
            None => default_api_url(host, port)?,
        };

        let sentry_sample_rate = parse_rate(&env, "SENTRY_SAMPLE_RATE")?;
        let sentry_traces_sample_rate = parse_rate(&env, "SENTRY_TRACES_SAMPLE_RATE")?;
        let tls = TlsConfig::from_lookup(&env)?;

        Ok(Self {
            host,
            port,
            api_url,
            seed,
            id_strategy,
            client_timeout: Duration::from_secs(timeout_secs),
            log_format,
            sentry_dsn: env("SENTRY_DSN"),
            sentry_environment: env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// The URL the server can reach itself on.
///
/// Binding to an unspecified address (0.0.0.0 / ::) still answers on loopback.
fn default_api_url(host: IpAddr, port: u16) -> Result<Url, ConfigError> {
    let reachable = if host.is_unspecified() {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    } else {
        host
    };
    let raw = format!("http://{}", SocketAddr::new(reachable, port));
    Url::parse(&raw)
        .map_err(|e| ConfigError::InvalidEnvVar("ROSTER_API_URL".to_string(), e.to_string()))
}

/// Parse a variable with `FromStr`, falling back to `default` when unset.
fn parse_var<T>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate in `0.0..=1.0`, defaulting to 1.0.
fn parse_rate(env: &impl Fn(&str) -> Option<String>, key: &str) -> Result<f32, ConfigError> {
    let rate: f32 = parse_var(env, key, "1.0")?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a rate between 0.0 and 1.0, got {rate}"),
        ))
    }
}

/// Parse a boolean flag (`true/false`, `1/0`, `yes/no`).
fn parse_bool(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = env(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {raw:?}"),
        )),
    }
}
