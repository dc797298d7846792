//! crates/blog_core/src/memory.rs
//!
//! In-process implementations of the ports. These back the stores in tests
//! and in any deployment that has no real backend behind it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::ports::{BackendLink, Clock, PortResult, SecretVerifier, SessionStorage};
use crate::sync::lock;

//=========================================================================================
// Session Storage
//=========================================================================================

/// Key-value records held in a map. Survives only as long as the value does,
/// so a "restart" in tests means opening a new store over the same instance.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    records: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `key` already holding `value`.
    pub fn with_record(key: &str, value: &str) -> Self {
        let storage = Self::default();
        lock(&storage.records).insert(key.to_string(), value.to_string());
        storage
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn read(&self, key: &str) -> PortResult<Option<String>> {
        Ok(lock(&self.records).get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> PortResult<()> {
        lock(&self.records).insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        lock(&self.records).remove(key);
        Ok(())
    }
}

//=========================================================================================
// Backend Link and Clock
//=========================================================================================

/// A backend that answers instantly.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateLink;

#[async_trait]
impl BackendLink for ImmediateLink {
    async fn round_trip(&self) -> PortResult<()> {
        Ok(())
    }
}

/// Wall-clock time in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

//=========================================================================================
// Secrets
//=========================================================================================

/// Stores secrets exactly as given and compares them byte for byte.
///
/// This is a stand-in with no protection at all. Anything reachable by real
/// users must seal with a hashing verifier instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextSecrets;

impl SecretVerifier for PlaintextSecrets {
    fn seal(&self, secret: &str) -> PortResult<String> {
        Ok(secret.to_string())
    }

    fn verify(&self, secret: &str, sealed: &str) -> bool {
        secret == sealed
    }
}
