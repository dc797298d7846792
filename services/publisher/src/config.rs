//! services/publisher/src/config.rs
//!
//! Defines the service's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// How account secrets are sealed before they are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialScheme {
    Argon2,
    /// No protection; for local demos only.
    Plaintext,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub session_file: PathBuf,
    pub log_level: Level,
    pub simulated_latency: Duration,
    pub credential_scheme: CredentialScheme,
    pub seed_demo_content: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Parses configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_file = lookup("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/session.json"));

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let latency_str = lookup("SIMULATED_LATENCY_MS").unwrap_or_else(|| "1000".to_string());
        let simulated_latency = latency_str
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidValue("SIMULATED_LATENCY_MS".to_string(), e.to_string()))?;

        let credential_scheme = match lookup("CREDENTIAL_SCHEME")
            .unwrap_or_else(|| "argon2".to_string())
            .to_lowercase()
            .as_str()
        {
            "argon2" => CredentialScheme::Argon2,
            "plaintext" => CredentialScheme::Plaintext,
            other => {
                return Err(ConfigError::InvalidValue(
                    "CREDENTIAL_SCHEME".to_string(),
                    format!("'{}' is not one of argon2, plaintext", other),
                ))
            }
        };

        let seed_str = lookup("SEED_DEMO_CONTENT").unwrap_or_else(|| "true".to_string());
        let seed_demo_content = seed_str.parse::<bool>().map_err(|e| {
            ConfigError::InvalidValue("SEED_DEMO_CONTENT".to_string(), e.to_string())
        })?;

        Ok(Self {
            session_file,
            log_level,
            simulated_latency,
            credential_scheme,
            seed_demo_content,
        })
    }
}
