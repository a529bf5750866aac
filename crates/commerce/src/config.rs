//! Commerce configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)

use secrecy::SecretString;
use thiserror::Error;

/// Default connection pool size.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Commerce library configuration.
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl CommerceConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `DATABASE_URL` is not set, or
    /// `ConfigError::InvalidEnvVar` if `DATABASE_MAX_CONNECTIONS` is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_owned()))?;

        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "DATABASE_MAX_CONNECTIONS".to_owned(),
                    format!("expected a positive integer, got {raw:?}"),
                )
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url: SecretString::from(database_url),
            max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_database_url_is_reported() {
        // Env-var isolation: construct directly instead of mutating process env.
        let err = ConfigError::MissingEnvVar("DATABASE_URL".to_owned());
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_env_var_message() {
        let err = ConfigError::InvalidEnvVar(
            "DATABASE_MAX_CONNECTIONS".to_owned(),
            "expected a positive integer, got \"zero\"".to_owned(),
        );
        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));
    }
}
