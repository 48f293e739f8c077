//! JSON file cache store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::cache::{CacheSnapshot, CacheStore};
use crate::domain::DomainError;

/// Cache store persisted as one JSON object on disk
///
/// Saves go to a sibling `*.tmp` file that is then renamed over the target,
/// so readers never observe a half-written mapping.
#[derive(Debug, Clone)]
pub struct JsonFileCacheStore {
    path: PathBuf,
}

impl JsonFileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cache".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CacheStore for JsonFileCacheStore {
    async fn load(&self) -> Result<CacheSnapshot, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cache file yet, starting empty");
                return Ok(CacheSnapshot::new());
            }
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::storage_corrupt(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError> {
        let data = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| DomainError::storage(format!("Failed to serialize cache: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &data).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", temp.display(), e))
        })?;
        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to move {} to {}: {}",
                temp.display(),
                self.path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), entries = snapshot.len(), "Cache saved");
        Ok(())
    }
}
