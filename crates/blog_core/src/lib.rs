pub mod content;
pub mod domain;
pub mod error;
pub mod identity;
pub mod memory;
pub mod ports;
pub mod query;
pub mod summary;
mod sync;

pub use content::ContentStore;
pub use domain::{AuthorRef, Post, User};
pub use error::{StoreError, StoreResult};
pub use identity::{IdentityStore, SESSION_KEY};
pub use memory::{ImmediateLink, InMemorySessionStorage, PlaintextSecrets, SystemClock};
pub use ports::{BackendLink, Clock, PortError, PortResult, SecretVerifier, SessionStorage};
pub use query::{paginate, search, Page, DEFAULT_PAGE_SIZE};
pub use sync::{BusyFlag, BusyGuard};
