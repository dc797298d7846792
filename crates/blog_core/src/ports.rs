//! crates/blog_core/src/ports.rs
//!
//! Defines the service contracts (traits) the stores depend on.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of where the session lives on disk, how long the
//! backend takes to answer, what time it is, and how secrets are sealed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., filesystem).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A durable string key-value record store. Values survive a restart.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Returns the value under `key`, or `None` when the key is absent.
    async fn read(&self, key: &str) -> PortResult<Option<String>>;

    async fn write(&self, key: &str, value: &str) -> PortResult<()>;

    /// Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> PortResult<()>;
}

/// The round trip to the backend that owns users and posts.
///
/// Every register, authenticate, create, update and delete awaits one round
/// trip before touching state. Swapping the implementation swaps the
/// transport without changing the stores.
#[async_trait]
pub trait BackendLink: Send + Sync {
    async fn round_trip(&self) -> PortResult<()>;
}

/// Source of the timestamps stamped onto posts.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Turns a raw secret into its stored form and checks candidates against it.
pub trait SecretVerifier: Send + Sync {
    fn seal(&self, secret: &str) -> PortResult<String>;

    /// A sealed value that cannot be interpreted never verifies.
    fn verify(&self, secret: &str, sealed: &str) -> bool;
}
