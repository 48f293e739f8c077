//! Application state for shared services

use std::sync::Arc;

use crate::domain::QueryOrchestrator;

/// Application state shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub orchestrator: Arc<QueryOrchestrator>,
}

impl AppState {
    /// Create new application state around the query orchestrator
    pub fn new(orchestrator: Arc<QueryOrchestrator>) -> Self {
        Self { orchestrator }
    }
}
