//! Greedy answer generation

use std::sync::Arc;

use tracing::debug;

use super::model::LanguageModel;
use super::prompt::{build_prompt, extract_answer, is_terminal};
use crate::domain::DomainError;

/// Limits applied to a single generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Longest tokenized prompt fed to the model; longer prompts lose their
    /// earliest tokens
    pub max_input_tokens: usize,
    /// Hard bound on decoding steps
    pub max_new_tokens: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_input_tokens: 200,
            max_new_tokens: 50,
        }
    }
}

/// Why the decoding loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last appended token decoded to terminal punctuation
    Terminal,
    /// `max_new_tokens` steps were taken
    Exhausted,
}

/// Token sequence and attention mask evolving during decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationState {
    input_ids: Vec<u32>,
    attention_mask: Vec<u32>,
    prompt_len: usize,
}

impl GenerationState {
    /// Starts from prompt tokens, keeping only the last `max_len`
    pub fn from_prompt(mut ids: Vec<u32>, max_len: usize) -> Self {
        if ids.len() > max_len {
            ids.drain(..ids.len() - max_len);
        }

        let attention_mask = vec![1; ids.len()];
        let prompt_len = ids.len();

        Self {
            input_ids: ids,
            attention_mask,
            prompt_len,
        }
    }

    pub fn push(&mut self, token: u32) {
        self.input_ids.push(token);
        self.attention_mask.push(1);
    }

    pub fn input_ids(&self) -> &[u32] {
        &self.input_ids
    }

    pub fn attention_mask(&self) -> &[u32] {
        &self.attention_mask
    }

    pub fn prompt_len(&self) -> usize {
        self.prompt_len
    }

    pub fn generated_len(&self) -> usize {
        self.input_ids.len() - self.prompt_len
    }
}

/// Answers a question from context text by greedy decoding
#[derive(Clone)]
pub struct AnswerGenerator {
    model: Arc<dyn LanguageModel>,
    config: GenerationConfig,
}

impl std::fmt::Debug for AnswerGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerGenerator")
            .field("model", &self.model.name())
            .field("config", &self.config)
            .finish()
    }
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self::with_config(model, GenerationConfig::default())
    }

    pub fn with_config(model: Arc<dyn LanguageModel>, config: GenerationConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates an answer for `question` grounded on `context`
    ///
    /// Tokenizer and model failures are returned as-is; nothing is retried.
    pub fn generate(&self, question: &str, context: &str) -> Result<String, DomainError> {
        let prompt = build_prompt(question, context);
        let prompt_ids = self.model.encode(&prompt)?;
        let mut state = GenerationState::from_prompt(prompt_ids, self.config.max_input_tokens);

        let stop_reason = self.decode_greedy(&mut state)?;

        debug!(
            model = self.model.name(),
            prompt_tokens = state.prompt_len(),
            new_tokens = state.generated_len(),
            ?stop_reason,
            "Generation finished"
        );

        let decoded = self.model.decode(state.input_ids(), true)?;
        Ok(extract_answer(&decoded))
    }

    fn decode_greedy(&self, state: &mut GenerationState) -> Result<StopReason, DomainError> {
        for _ in 0..self.config.max_new_tokens {
            let probabilities = self
                .model
                .next_token_probabilities(state.input_ids(), state.attention_mask())?;
            let next = argmax(&probabilities)
                .ok_or_else(|| DomainError::generation("model returned an empty distribution"))?;

            state.push(next);

            let token_text = self.model.decode(&[next], false)?;
            if is_terminal(&token_text) {
                return Ok(StopReason::Terminal);
            }
        }

        Ok(StopReason::Exhausted)
    }
}

/// Index of the highest probability; ties go to the lowest index
fn argmax(probabilities: &[f32]) -> Option<u32> {
    let mut best: Option<(usize, f32)> = None;

    for (idx, &p) in probabilities.iter().enumerate() {
        if p.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, best_p)| p > best_p) {
            best = Some((idx, p));
        }
    }

    best.and_then(|(idx, _)| u32::try_from(idx).ok())
}
