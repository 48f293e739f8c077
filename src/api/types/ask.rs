//! Request body of the ask endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /ask`
///
/// `question` is kept as a raw JSON value so a missing, null or non-string
/// field is rejected by the handler with the same error as an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<Value>,
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: Some(Value::String(question.into())),
        }
    }

    /// The question text, or `""` when absent or not a string
    pub fn question(&self) -> &str {
        self.question
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}
