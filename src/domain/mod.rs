//! Domain layer - Core business logic and entities

pub mod cache;
pub mod error;
pub mod generation;
pub mod query;
pub mod retrieval;

pub use cache::{CacheSnapshot, CacheStore, QueryKey};
pub use error::DomainError;
pub use generation::{AnswerGenerator, GenerationConfig, LanguageModel};
pub use query::{AnswerResponse, QueryOrchestrator};
pub use retrieval::{RetrievalResult, SnippetSource};
