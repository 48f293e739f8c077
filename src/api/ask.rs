//! Question answering endpoint handler

use std::time::Instant;

use axum::extract::State;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, AskRequest, Json};
use crate::domain::AnswerResponse;

/// POST /ask
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let question = request.question();
    let start = Instant::now();

    info!(question = %question, "Processing ask request");

    match state.orchestrator.answer(question).await {
        Ok(response) => {
            info!(
                from_cache = response.from_cache,
                latency_ms = start.elapsed().as_millis() as u64,
                "Answer generated"
            );
            Ok(Json(response))
        }
        Err(e) => {
            warn!(error = %e, "Ask request failed");
            Err(e.into())
        }
    }
}
