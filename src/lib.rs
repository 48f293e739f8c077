//! Alphonse
//!
//! Answers questions from live web search snippets with a local GPT-2:
//! - Cache of normalized question to retrieved context, persisted as JSON
//! - Snippet retrieval from an HTML search page
//! - Greedy answer generation behind a fixed persona prompt

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{AnswerGenerator, DomainError, LanguageModel, QueryOrchestrator};
use infrastructure::{
    cache::CacheFactory, model::LocalGpt2Model, search::WebSnippetRetriever,
};
use tracing::info;

/// Create the application state with all services initialized
pub fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    Ok(AppState::new(Arc::new(create_orchestrator(config)?)))
}

/// Wire cache, retriever and the local model into an orchestrator
///
/// Loading the model is the slow part and happens once here.
pub fn create_orchestrator(config: &AppConfig) -> Result<QueryOrchestrator, DomainError> {
    info!(
        backend = %config.cache.backend,
        path = %config.cache.path.display(),
        "Cache store selected"
    );
    let cache = CacheFactory::create(&config.cache);

    let retriever = Arc::new(WebSnippetRetriever::new(&config.search)?);

    let model: Arc<dyn LanguageModel> =
        Arc::new(LocalGpt2Model::load(&config.generation.model_dir)?);
    let generator = AnswerGenerator::with_config(model, config.generation.limits());

    Ok(QueryOrchestrator::new(cache, retriever, generator)
        .with_reset_on_corrupt(config.cache.reset_on_corrupt))
}
