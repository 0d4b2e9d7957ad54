use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Two weeks, the conventional lifetime of a "remember me" login cookie.
const DEFAULT_SESSION_TTL_SECS: u64 = 14 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub data_dir: String,
    /// Lifetime of a login session in seconds.
    pub session_ttl_secs: u64,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let session_ttl_secs = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let config = Config {
            bind_address,
            data_dir,
            session_ttl_secs,
            test_mode,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::ValidationError(
                "BIND_ADDRESS cannot be empty".to_string(),
            ));
        }

        if self.session_ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "SESSION_TTL_SECS must be greater than 0".to_string(),
            ));
        }

        if self.test_mode {
            tracing::warn!("TEST_MODE is enabled. Do not run this configuration in production.");
        }

        Ok(())
    }
}
