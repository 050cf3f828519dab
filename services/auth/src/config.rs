//! Configuration for the authentication core

use secrecy::{ExposeSecret, SecretString};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::password::HasherConfig;
use crate::session::{MAX_SESSION_TTL, MIN_SECRET_LEN};
use crate::todos::DenialPolicy;

/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Authentication core configuration
#[derive(Debug)]
pub struct AuthConfig {
    /// HMAC secret for signing session tokens
    pub session_secret: SecretString,
    /// Lifetime of a session token (default: 24 hours)
    pub session_ttl: Duration,
    /// Minimum password length in characters (default: 1)
    pub password_min_length: usize,
    /// Argon2id cost parameters
    pub hasher: HasherConfig,
    /// Deadline applied to each storage call (default: 5 seconds)
    pub storage_timeout: Duration,
    /// How cross-tenant todo access is reported (default: not found)
    pub ownership_denial: DenialPolicy,
}

impl AuthConfig {
    /// Create a new AuthConfig from environment variables
    ///
    /// # Environment Variables
    /// - `AUTH_SESSION_SECRET`: HMAC signing secret, at least 32 bytes (required)
    /// - `AUTH_SESSION_TTL`: Session lifetime in seconds, at most one year (default: 86400)
    /// - `AUTH_PASSWORD_MIN_LENGTH`: Password length floor (default: 1)
    /// - `AUTH_ARGON2_MEMORY_KIB`: Argon2 memory cost (default: 19456)
    /// - `AUTH_ARGON2_ITERATIONS`: Argon2 time cost (default: 2)
    /// - `AUTH_ARGON2_PARALLELISM`: Argon2 lanes (default: 1)
    /// - `AUTH_STORAGE_TIMEOUT_MS`: Storage deadline in milliseconds (default: 5000)
    /// - `AUTH_OWNERSHIP_DENIAL`: `not_found` or `forbidden` (default: not_found)
    pub fn from_env() -> Result<Self, ConfigError> {
        let session_secret = std::env::var("AUTH_SESSION_SECRET")
            .map_err(|_| ConfigError::Missing("AUTH_SESSION_SECRET"))?;
        let session_secret = SecretString::from(session_secret);

        if session_secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                var: "AUTH_SESSION_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }

        let session_ttl = Duration::from_secs(env_or("AUTH_SESSION_TTL", 86_400));
        if session_ttl.is_zero() || session_ttl > MAX_SESSION_TTL {
            return Err(ConfigError::Invalid {
                var: "AUTH_SESSION_TTL",
                reason: format!("must be between 1 and {} seconds", MAX_SESSION_TTL.as_secs()),
            });
        }

        let defaults = HasherConfig::default();
        let hasher = HasherConfig {
            memory_kib: env_or("AUTH_ARGON2_MEMORY_KIB", defaults.memory_kib),
            iterations: env_or("AUTH_ARGON2_ITERATIONS", defaults.iterations),
            parallelism: env_or("AUTH_ARGON2_PARALLELISM", defaults.parallelism),
        };

        let ownership_denial = match std::env::var("AUTH_OWNERSHIP_DENIAL") {
            Ok(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                var: "AUTH_OWNERSHIP_DENIAL",
                reason,
            })?,
            Err(_) => DenialPolicy::default(),
        };

        Ok(AuthConfig {
            session_secret,
            session_ttl,
            password_min_length: env_or("AUTH_PASSWORD_MIN_LENGTH", 1),
            hasher,
            storage_timeout: Duration::from_millis(env_or("AUTH_STORAGE_TIMEOUT_MS", 5_000)),
            ownership_denial,
        })
    }
}

/// Parse an environment variable, falling back to `default` when it is unset
/// or unparseable.
fn env_or<T: FromStr>(var: &str, default: T) -> T {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
