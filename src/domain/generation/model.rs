//! Language model capability consumed by the answer generator

use crate::domain::DomainError;

/// Causal language model with its tokenizer
///
/// Loaded once and shared read-only between requests. All methods are
/// synchronous and CPU bound; async callers should run them on a blocking
/// thread.
pub trait LanguageModel: Send + Sync {
    /// Tokenizes `text` without truncation or special tokens
    fn encode(&self, text: &str) -> Result<Vec<u32>, DomainError>;

    /// Probability distribution over the vocabulary for the token following
    /// the last position of `input_ids`
    ///
    /// `attention_mask` has the same length as `input_ids`.
    fn next_token_probabilities(
        &self,
        input_ids: &[u32],
        attention_mask: &[u32],
    ) -> Result<Vec<f32>, DomainError>;

    /// Turns token ids back into text
    fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String, DomainError>;

    /// Identifier used in logs
    fn name(&self) -> &str;
}
