//! services/publisher/src/adapters/latency.rs
//!
//! A `BackendLink` that stands in for a remote backend by sleeping.

use async_trait::async_trait;
use blog_core::ports::{BackendLink, PortResult};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct SimulatedLatency {
    delay: Duration,
}

impl SimulatedLatency {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl BackendLink for SimulatedLatency {
    async fn round_trip(&self) -> PortResult<()> {
        if !self.delay.is_zero() {
            debug!("Simulating backend round trip of {:?}", self.delay);
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }
}
