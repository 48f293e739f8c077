//! Cache-first question answering

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use super::response::AnswerResponse;
use crate::domain::cache::{CacheSnapshot, CacheStore, QueryKey};
use crate::domain::generation::AnswerGenerator;
use crate::domain::retrieval::{RetrievalResult, SnippetSource};
use crate::domain::DomainError;

/// Resolves context for a question (cache first, then the web) and
/// generates the answer from it
///
/// Every retrieved context is cached, including the fallback texts produced
/// when a search fails or finds nothing. A question whose search failed
/// once keeps answering from that fallback until the store is cleared.
pub struct QueryOrchestrator {
    cache: Arc<dyn CacheStore>,
    retriever: Arc<dyn SnippetSource>,
    generator: AnswerGenerator,
    write_lock: Mutex<()>,
    reset_on_corrupt: bool,
}

impl std::fmt::Debug for QueryOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryOrchestrator")
            .field("cache", &self.cache)
            .field("generator", &self.generator)
            .field("reset_on_corrupt", &self.reset_on_corrupt)
            .finish_non_exhaustive()
    }
}

impl QueryOrchestrator {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        retriever: Arc<dyn SnippetSource>,
        generator: AnswerGenerator,
    ) -> Self {
        Self {
            cache,
            retriever,
            generator,
            write_lock: Mutex::new(()),
            reset_on_corrupt: false,
        }
    }

    /// Treat a corrupt cache store as empty instead of failing the request
    pub fn with_reset_on_corrupt(mut self, reset: bool) -> Self {
        self.reset_on_corrupt = reset;
        self
    }

    /// Answers `question`
    ///
    /// Fails with [`DomainError::InvalidInput`] for a blank question before
    /// touching the cache, the web or the model.
    pub async fn answer(&self, question: &str) -> Result<AnswerResponse, DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::invalid_input("No question provided"));
        }

        let retrieval = self.resolve_context(question).await?;

        let generator = self.generator.clone();
        let owned_question = question.to_string();
        let context = retrieval.context.clone();
        let answer = tokio::task::spawn_blocking(move || generator.generate(&owned_question, &context))
            .await
            .map_err(|e| DomainError::internal(format!("Generation task failed: {}", e)))??;

        Ok(AnswerResponse::new(
            question,
            answer,
            retrieval.from_cache,
            &retrieval.context,
        ))
    }

    /// Returns cached context for the normalized question, fetching and
    /// persisting it on a miss
    pub async fn resolve_context(&self, question: &str) -> Result<RetrievalResult, DomainError> {
        let key = QueryKey::normalize(question);
        let snapshot = self.load_snapshot().await?;

        if let Some(context) = snapshot.get(key.as_str()) {
            info!(key = %key, "Context served from cache");
            return Ok(RetrievalResult::cached(context.clone()));
        }

        info!(key = %key, "Cache miss, searching the web");
        let context = self.retriever.fetch(question).await;
        self.store(key, &context).await?;

        Ok(RetrievalResult::fetched(context))
    }

    /// Number of entries currently in the cache store
    pub async fn cached_entries(&self) -> Result<usize, DomainError> {
        Ok(self.load_snapshot().await?.len())
    }

    async fn store(&self, key: QueryKey, context: &str) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;

        let mut snapshot = self.load_snapshot().await?;
        snapshot.insert(key.into_inner(), context.to_string());

        self.cache.save(&snapshot).await
    }

    async fn load_snapshot(&self) -> Result<CacheSnapshot, DomainError> {
        match self.cache.load().await {
            Err(DomainError::StorageCorrupt { message }) if self.reset_on_corrupt => {
                warn!(error = %message, "Cache store is corrupt, continuing with an empty cache");
                Ok(CacheSnapshot::new())
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCacheStore;
    use crate::domain::generation::{LanguageModel, ScriptedModel};
    use crate::domain::retrieval::{
        broken_web_sentinel, MockSnippetSource, NOTHING_FOUND_SENTINEL, WEB_BROKEN_PREFIX,
    };

    const FRANCE: &str = "What is the capital of France?";

    fn orchestrator(
        cache: &Arc<MockCacheStore>,
        retriever: MockSnippetSource,
        model: &Arc<ScriptedModel>,
    ) -> QueryOrchestrator {
        QueryOrchestrator::new(
            cache.clone() as Arc<dyn CacheStore>,
            Arc::new(retriever),
            AnswerGenerator::new(model.clone() as Arc<dyn LanguageModel>),
        )
    }

    fn retriever_returning(times: usize, context: impl Into<String>) -> MockSnippetSource {
        let context = context.into();
        let mut retriever = MockSnippetSource::new();
        retriever
            .expect_fetch()
            .times(times)
            .returning(move |_| context.clone());
        retriever
    }

    #[tokio::test]
    async fn test_cache_miss_fetches_and_persists() {
        let cache = Arc::new(MockCacheStore::new());
        let mut retriever = MockSnippetSource::new();
        retriever
            .expect_fetch()
            .withf(|query| query.to_string() == FRANCE)
            .times(1)
            .returning(|_| "Paris is the capital of France.".to_string());
        let model = Arc::new(ScriptedModel::new("Paris, duh."));

        let response = orchestrator(&cache, retriever, &model)
            .answer(FRANCE)
            .await
            .unwrap();

        assert_eq!(response.question, FRANCE);
        assert_eq!(response.answer, "Paris, duh.");
        assert!(!response.from_cache);
        assert_eq!(response.web_data, "Paris is the capital of France.");
        assert_eq!(
            cache.entries().get("what is the capital of france?").map(String::as_str),
            Some("Paris is the capital of France.")
        );
        assert_eq!(cache.save_count(), 1);
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let cache = Arc::new(MockCacheStore::new());
        let model = Arc::new(ScriptedModel::new("Paris."));
        let orchestrator = orchestrator(&cache, retriever_returning(1, "Paris is in France."), &model);

        let first = orchestrator.answer(FRANCE).await.unwrap();
        let second = orchestrator.answer(FRANCE).await.unwrap();

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.web_data, second.web_data);
        assert_eq!(cache.save_count(), 1);
    }

    #[tokio::test]
    async fn test_normalized_variants_share_cache_entry() {
        let cache = Arc::new(MockCacheStore::new());
        let model = Arc::new(ScriptedModel::new("."));
        let orchestrator = orchestrator(&cache, retriever_returning(1, "City of light."), &model);

        assert!(!orchestrator.answer("Paris").await.unwrap().from_cache);
        assert!(orchestrator.answer(" paris ").await.unwrap().from_cache);
        assert!(orchestrator.answer("PARIS").await.unwrap().from_cache);
        assert_eq!(cache.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_existing_entry_is_used_without_search() {
        let cache = Arc::new(MockCacheStore::new().with_entry("who wrote hamlet?", "Shakespeare."));
        let model = Arc::new(ScriptedModel::new("Will."));

        let response = orchestrator(&cache, retriever_returning(0, "unused"), &model)
            .answer("Who  wrote Hamlet?")
            .await
            .unwrap();

        assert!(response.from_cache);
        assert_eq!(response.web_data, "Shakespeare.");
        assert_eq!(cache.save_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_question_touches_nothing() {
        let cache = Arc::new(MockCacheStore::new());
        let model = Arc::new(ScriptedModel::new("."));
        let orchestrator = orchestrator(&cache, retriever_returning(0, "unused"), &model);

        for question in ["", "   "] {
            let err = orchestrator.answer(question).await.unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput { .. }));
        }

        assert_eq!(cache.load_count(), 0);
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_nothing_found_sentinel_is_cached() {
        let cache = Arc::new(MockCacheStore::new());
        let model = Arc::new(ScriptedModel::new("Shrug."));

        let response = orchestrator(&cache, retriever_returning(1, NOTHING_FOUND_SENTINEL), &model)
            .answer("zzqx")
            .await
            .unwrap();

        assert_eq!(response.web_data, NOTHING_FOUND_SENTINEL);
        assert_eq!(
            cache.entries().get("zzqx").map(String::as_str),
            Some(NOTHING_FOUND_SENTINEL)
        );
    }

    #[tokio::test]
    async fn test_broken_web_sentinel_is_cached_and_used_as_context() {
        let cache = Arc::new(MockCacheStore::new());
        let mut retriever = MockSnippetSource::new();
        retriever
            .expect_fetch()
            .times(1)
            .returning(|_| broken_web_sentinel("operation timed out"));
        let model = Arc::new(ScriptedModel::new("Oops."));
        let orchestrator = orchestrator(&cache, retriever, &model);

        let first = orchestrator.answer("capital of peru").await.unwrap();
        let second = orchestrator.answer("capital of peru").await.unwrap();

        assert!(first.web_data.starts_with(WEB_BROKEN_PREFIX));
        assert!(second.from_cache);
        assert!(cache.entries()["capital of peru"].starts_with(WEB_BROKEN_PREFIX));

        let calls = model.calls();
        let fed = model.decode(&calls[0].0, false).unwrap();
        assert!(fed.contains("Web data: Web's broken, mate."));
    }

    #[tokio::test]
    async fn test_long_context_preview_is_truncated() {
        let cache = Arc::new(MockCacheStore::new());
        let long = "word ".repeat(40);
        let model = Arc::new(ScriptedModel::new("."));

        let response = orchestrator(&cache, retriever_returning(1, long.clone()), &model)
            .answer("words")
            .await
            .unwrap();

        assert_eq!(response.web_data.chars().count(), 103);
        assert!(response.web_data.ends_with("..."));
        assert_eq!(cache.entries()["words"], long);
    }

    #[tokio::test]
    async fn test_generation_failure_is_surfaced() {
        let cache = Arc::new(MockCacheStore::new());
        let model = Arc::new(ScriptedModel::failing("tensor shape mismatch"));

        let err = orchestrator(&cache, retriever_returning(1, "ctx"), &model)
            .answer("q")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Generation { .. }));
        assert_eq!(cache.entries()["q"], "ctx");
    }

    #[tokio::test]
    async fn test_corrupt_store_is_surfaced_by_default() {
        let cache = Arc::new(MockCacheStore::new().with_corruption("expected value"));
        let model = Arc::new(ScriptedModel::new("."));

        let err = orchestrator(&cache, retriever_returning(0, "unused"), &model)
            .answer("q")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::StorageCorrupt { .. }));
        assert_eq!(cache.save_count(), 0);
    }

    #[tokio::test]
    async fn test_corrupt_store_can_degrade_to_empty() {
        let cache = Arc::new(MockCacheStore::new().with_corruption("expected value"));
        let model = Arc::new(ScriptedModel::new("."));

        let response = orchestrator(&cache, retriever_returning(1, "fresh"), &model)
            .with_reset_on_corrupt(true)
            .answer("q")
            .await
            .unwrap();

        assert!(!response.from_cache);
        assert_eq!(cache.entries()["q"], "fresh");
    }

    #[tokio::test]
    async fn test_concurrent_misses_keep_both_entries() {
        let cache = Arc::new(MockCacheStore::new());
        let mut retriever = MockSnippetSource::new();
        retriever
            .expect_fetch()
            .times(2)
            .returning(|query| format!("about {}", query));
        let model = Arc::new(ScriptedModel::new("."));
        let orchestrator = orchestrator(&cache, retriever, &model);

        let (a, b) = tokio::join!(
            orchestrator.resolve_context("alpha"),
            orchestrator.resolve_context("beta")
        );

        assert!(!a.unwrap().from_cache);
        assert!(!b.unwrap().from_cache);

        let entries = cache.entries();
        assert_eq!(entries["alpha"], "about alpha");
        assert_eq!(entries["beta"], "about beta");
    }

    #[tokio::test]
    async fn test_cached_entries_counts_store() {
        let cache = Arc::new(
            MockCacheStore::new()
                .with_entry("a", "1")
                .with_entry("b", "2"),
        );
        let model = Arc::new(ScriptedModel::new("."));
        let orchestrator = orchestrator(&cache, retriever_returning(0, "unused"), &model);

        assert_eq!(orchestrator.cached_entries().await.unwrap(), 2);
    }
}
