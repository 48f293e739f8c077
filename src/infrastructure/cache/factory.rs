//! Cache factory for runtime selection

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::cache::CacheStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryCacheStore;
use super::json_file::JsonFileCacheStore;

/// Supported cache backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Single JSON file on disk
    #[default]
    File,
    /// Process-local mapping
    Memory,
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackend::File => write!(f, "file"),
            CacheBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for CacheBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "json" => Ok(CacheBackend::File),
            "memory" | "in_memory" | "inmemory" => Ok(CacheBackend::Memory),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache backend: {}. Valid backends: file, memory",
                s
            ))),
        }
    }
}

/// Configuration for the cache factory
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Location of the JSON file (file backend only)
    pub path: PathBuf,
    /// Continue with an empty cache when the store cannot be parsed
    pub reset_on_corrupt: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::File,
            path: PathBuf::from("alphonse_cache.json"),
            reset_on_corrupt: false,
        }
    }
}

impl CacheConfig {
    /// Creates a configuration for a JSON file at `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: CacheBackend::File,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Creates a configuration for an in-memory store
    pub fn memory() -> Self {
        Self {
            backend: CacheBackend::Memory,
            ..Default::default()
        }
    }
}

/// Factory for creating cache store instances
#[derive(Debug)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates a cache store based on the configuration
    pub fn create(config: &CacheConfig) -> Arc<dyn CacheStore> {
        match config.backend {
            CacheBackend::File => Arc::new(JsonFileCacheStore::new(config.path.clone())),
            CacheBackend::Memory => Arc::new(InMemoryCacheStore::new()),
        }
    }
}
