//! services/publisher/src/adapters/session_file.rs
//!
//! The file-backed implementation of the `SessionStorage` port. All keys live
//! in a single JSON object on disk, rewritten in full on every change.

use async_trait::async_trait;
use blog_core::ports::{PortError, PortResult, SessionStorage};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, error};

type Records = BTreeMap<String, String>;

/// Durable key-value records stored as `{ "<key>": "<value>" }` in one file.
/// A missing file holds no keys.
pub struct JsonFileSessionStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles from this process.
    write_lock: Mutex<()>,
}

impl JsonFileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> PortResult<Records> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Records::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                error!("Session file {} is corrupt: {}", self.path.display(), e);
                PortError::Unexpected(format!("corrupt session file: {}", e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Records::new()),
            Err(e) => Err(io_failure(&self.path, e)),
        }
    }

    async fn save(&self, records: &Records) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_failure(parent, e))?;
        }

        let body = serde_json::to_string_pretty(records)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Write beside the target, then swap it in so readers never see half a file.
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, body)
            .await
            .map_err(|e| io_failure(&staging, e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| io_failure(&self.path, e))?;

        debug!("Wrote {} session record(s) to {}", records.len(), self.path.display());
        Ok(())
    }
}

fn io_failure(path: &Path, e: std::io::Error) -> PortError {
    error!("Session file I/O failed at {}: {}", path.display(), e);
    PortError::Unexpected(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl SessionStorage for JsonFileSessionStorage {
    async fn read(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    async fn write(&self, key: &str, value: &str) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        records.insert(key.to_string(), value.to_string());
        self.save(&records).await
    }

    async fn remove(&self, key: &str) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        if records.remove(key).is_none() {
            return Ok(());
        }
        self.save(&records).await
    }
}
