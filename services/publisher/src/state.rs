//! services/publisher/src/state.rs
//!
//! Builds the shared service state: the stores and the adapters behind them,
//! constructed once at startup and handed to every consumer.

use crate::adapters::{Argon2Secrets, JsonFileSessionStorage, SimulatedLatency};
use crate::config::{Config, CredentialScheme};
use crate::error::ServiceError;
use crate::seed;
use blog_core::ports::{BackendLink, Clock, SecretVerifier, SessionStorage};
use blog_core::{ContentStore, IdentityStore, PlaintextSecrets, SystemClock};
use std::sync::Arc;
use tracing::{info, warn};

/// The shared application state, created once at startup and passed to all consumers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identity: Arc<IdentityStore>,
    pub content: Arc<ContentStore>,
}

impl AppState {
    /// Wires the stores to the adapters named in `config`.
    pub async fn build(config: Config) -> Result<Self, ServiceError> {
        let storage: Arc<dyn SessionStorage> =
            Arc::new(JsonFileSessionStorage::new(config.session_file.clone()));
        let link: Arc<dyn BackendLink> = Arc::new(SimulatedLatency::new(config.simulated_latency));
        Self::with_adapters(config, storage, link).await
    }

    /// Like [`AppState::build`], with the storage and backend supplied by the caller.
    pub async fn with_adapters(
        config: Config,
        storage: Arc<dyn SessionStorage>,
        link: Arc<dyn BackendLink>,
    ) -> Result<Self, ServiceError> {
        let secrets: Arc<dyn SecretVerifier> = match config.credential_scheme {
            CredentialScheme::Argon2 => Arc::new(Argon2Secrets::new()),
            CredentialScheme::Plaintext => {
                warn!("Credentials are stored in plaintext; do not expose this instance");
                Arc::new(PlaintextSecrets)
            }
        };
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let identity = IdentityStore::open(storage, link.clone(), secrets).await?;

        let posts = if config.seed_demo_content {
            let demo = seed::enroll_demo_user(&identity)?;
            let posts = seed::demo_posts(&demo, clock.now());
            info!("Seeded demo account {} with {} posts", demo.email, posts.len());
            posts
        } else {
            Vec::new()
        };
        let content = ContentStore::with_posts(link, clock, posts);

        Ok(Self {
            config: Arc::new(config),
            identity: Arc::new(identity),
            content: Arc::new(content),
        })
    }
}
