//! Query domain - cache-first context resolution and answering

mod orchestrator;
mod response;

pub use orchestrator::QueryOrchestrator;
pub use response::{context_preview, AnswerResponse, PREVIEW_CHARS};
