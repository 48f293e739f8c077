//! In-memory cache store

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::cache::{CacheSnapshot, CacheStore};
use crate::domain::DomainError;

/// Thread-safe in-memory cache store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<CacheSnapshot>,
}

impl InMemoryCacheStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with entries
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let snapshot = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        Self {
            entries: RwLock::new(snapshot),
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn load(&self) -> Result<CacheSnapshot, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.clone())
    }

    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        *entries = snapshot.clone();
        Ok(())
    }
}
