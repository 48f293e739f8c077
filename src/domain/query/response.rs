//! Answer payload returned to the boundary layer

use serde::{Deserialize, Serialize};

/// Number of context characters kept in [`AnswerResponse::web_data`]
pub const PREVIEW_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Result of answering one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub question: String,
    pub answer: String,
    pub from_cache: bool,
    /// Context preview, see [`context_preview`]
    pub web_data: String,
}

impl AnswerResponse {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        from_cache: bool,
        context: &str,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            from_cache,
            web_data: context_preview(context),
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of `context`, with an ellipsis when cut
pub fn context_preview(context: &str) -> String {
    match context.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{}", &context[..cut], ELLIPSIS),
        None => context.to_string(),
    }
}
