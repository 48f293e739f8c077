//! Generation domain - prompt construction and greedy decoding

mod generator;
mod model;
mod prompt;

pub use generator::{AnswerGenerator, GenerationConfig, GenerationState, StopReason};
pub use model::LanguageModel;
pub use prompt::{build_prompt, extract_answer, ANSWER_CUE, PERSONA, TERMINAL_TOKENS};

#[cfg(test)]
pub use model::mock::ScriptedModel;
