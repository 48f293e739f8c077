//! Cache store trait definition

use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Full key to context mapping as persisted by a store
pub type CacheSnapshot = BTreeMap<String, String>;

/// Persisted key to context-text mapping
///
/// Keys are opaque: the store never folds case or trims. Callers are
/// expected to pass keys produced by [`super::QueryKey::normalize`].
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Loads the whole mapping; an absent store yields an empty mapping
    ///
    /// Returns [`DomainError::StorageCorrupt`] when the persisted data
    /// cannot be read back as a string to string mapping.
    async fn load(&self) -> Result<CacheSnapshot, DomainError>;

    /// Replaces the persisted mapping with `snapshot`
    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Mock store that counts calls and can simulate a corrupt backing file
    #[derive(Debug, Default)]
    pub struct MockCacheStore {
        entries: Mutex<CacheSnapshot>,
        corrupt: Mutex<Option<String>>,
        loads: Mutex<usize>,
        saves: Mutex<usize>,
    }

    impl MockCacheStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, key: &str, value: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            self
        }

        pub fn with_corruption(self, message: impl Into<String>) -> Self {
            *self.corrupt.lock().unwrap() = Some(message.into());
            self
        }

        pub fn entries(&self) -> CacheSnapshot {
            self.entries.lock().unwrap().clone()
        }

        pub fn load_count(&self) -> usize {
            *self.loads.lock().unwrap()
        }

        pub fn save_count(&self) -> usize {
            *self.saves.lock().unwrap()
        }
    }

    #[async_trait]
    impl CacheStore for MockCacheStore {
        async fn load(&self) -> Result<CacheSnapshot, DomainError> {
            *self.loads.lock().unwrap() += 1;

            if let Some(message) = self.corrupt.lock().unwrap().clone() {
                return Err(DomainError::storage_corrupt(message));
            }

            Ok(self.entries.lock().unwrap().clone())
        }

        async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError> {
            *self.saves.lock().unwrap() += 1;
            *self.corrupt.lock().unwrap() = None;
            *self.entries.lock().unwrap() = snapshot.clone();
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_store_round_trip() {
            let store = MockCacheStore::new().with_entry("paris", "Paris is in France.");

            let mut snapshot = store.load().await.unwrap();
            assert_eq!(snapshot.get("paris").map(String::as_str), Some("Paris is in France."));

            snapshot.insert("rome".to_string(), "Rome is in Italy.".to_string());
            store.save(&snapshot).await.unwrap();

            assert_eq!(store.entries().len(), 2);
            assert_eq!(store.load_count(), 1);
            assert_eq!(store.save_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_store_corruption() {
            let store = MockCacheStore::new().with_corruption("not json");

            let err = store.load().await.unwrap_err();
            assert!(matches!(err, DomainError::StorageCorrupt { .. }));
        }
    }
}
