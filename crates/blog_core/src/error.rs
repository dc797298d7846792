//! crates/blog_core/src/error.rs
//!
//! The failures a store operation can end in. Every variant is terminal for
//! the call that produced it; nothing is retried.

use uuid::Uuid;

use crate::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("User with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("You must be logged in to do that")]
    Unauthenticated,

    #[error("Post {0} not found")]
    NotFound(Uuid),

    #[error("You can only change your own posts")]
    Forbidden,

    /// An adapter behind one of the ports failed.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),
}

pub type StoreResult<T> = Result<T, StoreError>;
