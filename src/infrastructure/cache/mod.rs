//! Cache infrastructure - Cache store implementations

mod factory;
mod in_memory;
mod json_file;

pub use factory::{CacheBackend, CacheConfig, CacheFactory};
pub use in_memory::InMemoryCacheStore;
pub use json_file::JsonFileCacheStore;
