//! services/publisher/src/error.rs
//!
//! Defines the primary error type for the publisher service.

use crate::config::ConfigError;
use blog_core::error::StoreError;

/// The primary error type for the `publisher` service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A store operation ended in one of its typed failures.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
