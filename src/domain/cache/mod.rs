//! Cache domain - persisted query to context mapping

mod key;
mod repository;

pub use key::QueryKey;
pub use repository::{CacheSnapshot, CacheStore};

#[cfg(test)]
pub use repository::mock::MockCacheStore;
