//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `INCUBATOR_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `INCUBATOR_JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `INCUBATOR_HOST` - Bind address (default: 127.0.0.1)
//! - `INCUBATOR_PORT` - Listen port (default: 5000)
//! - `INCUBATOR_JWT_TTL_HOURS` - Token lifetime in hours (default: 24)
//! - `INCUBATOR_CORS_ORIGINS` - Comma-separated origins allowed to call the API
//! - `GEMINI_API_KEY` - Enables the meeting-minutes summarizer
//! - `GEMINI_MODEL` - Generative model name (default: gemini-1.5-flash)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MAX_JWT_TTL_HOURS: i64 = 24 * 30;
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

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

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Token signing configuration
    pub jwt: JwtConfig,
    /// Origins allowed by the CORS layer (empty = no CORS layer)
    pub cors_origins: Vec<String>,
    /// Generative-AI configuration for the minutes summarizer
    pub gemini: Option<GeminiConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// JWT signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: SecretString,
    /// Lifetime of issued tokens, in hours
    pub ttl_hours: i64,
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent in the `x-goog-api-key` header
    pub api_key: SecretString,
    /// Model used for `generateContent`
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl ApiConfig {
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

        let database_url = env_var("INCUBATOR_DATABASE_URL")
            .or_else(|| env_var("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("INCUBATOR_DATABASE_URL".to_string()))?;

        Ok(Self {
            database_url,
            host: parse_env("INCUBATOR_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_env("INCUBATOR_PORT", 5000)?,
            jwt: JwtConfig::from_env()?,
            cors_origins: env_var("INCUBATOR_CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
            gemini: GeminiConfig::from_env(),
            sentry_dsn: env_var("SENTRY_DSN"),
            sentry_environment: env_var("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        const VAR: &str = "INCUBATOR_JWT_SECRET";

        let raw = env_var(VAR).ok_or_else(|| ConfigError::MissingEnvVar(VAR.to_string()))?;
        check_signing_secret(&raw).map_err(|reason| ConfigError::InsecureSecret(VAR.to_string(), reason))?;

        let ttl_hours = parse_env("INCUBATOR_JWT_TTL_HOURS", 24)?;
        if !(1..=MAX_JWT_TTL_HOURS).contains(&ttl_hours) {
            return Err(ConfigError::InvalidEnvVar(
                "INCUBATOR_JWT_TTL_HOURS".to_string(),
                format!("must be between 1 and {MAX_JWT_TTL_HOURS} hours"),
            ));
        }

        Ok(Self {
            secret: SecretString::from(raw),
            ttl_hours,
        })
    }
}

impl GeminiConfig {
    fn from_env() -> Option<Self> {
        Some(Self {
            api_key: SecretString::from(env_var("GEMINI_API_KEY")?),
            model: env_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Read an environment variable, treating blank values as unset.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shannon entropy of `s` in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    let mut counts: HashMap<char, u32> = HashMap::new();
    let mut total = 0_u32;
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let total = f64::from(total);
    counts
        .values()
        .map(|&n| {
            let p = f64::from(n) / total;
            -p * p.log2()
        })
        .sum()
}

/// Reject signing secrets that are short, look like placeholders, or have low entropy.
fn check_signing_secret(secret: &str) -> Result<(), String> {
    let length = secret.chars().count();
    if length < MIN_JWT_SECRET_LENGTH {
        return Err(format!(
            "must be at least {MIN_JWT_SECRET_LENGTH} characters (got {length})"
        ));
    }

    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(format!("appears to be a placeholder (contains '{pattern}')"));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}); use a randomly generated secret"
        ));
    }

    Ok(())
}
