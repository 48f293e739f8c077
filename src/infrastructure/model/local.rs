//! Language model loaded from a local checkpoint directory

use std::path::{Path, PathBuf};

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use tokenizers::Tokenizer;
use tracing::info;

use super::gpt2::{Gpt2, Gpt2Config};
use crate::domain::generation::LanguageModel;
use crate::domain::DomainError;

pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// GPT-2 checkpoint plus its tokenizer, running on the CPU
///
/// Expects a directory laid out like a Hugging Face model repository:
/// `tokenizer.json`, `config.json` and `model.safetensors`.
pub struct LocalGpt2Model {
    name: String,
    tokenizer: Tokenizer,
    network: Gpt2,
}

impl std::fmt::Debug for LocalGpt2Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalGpt2Model")
            .field("name", &self.name)
            .field("config", self.network.config())
            .finish_non_exhaustive()
    }
}

impl LocalGpt2Model {
    /// Loads tokenizer, config and weights from `model_dir`
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let model_dir = model_dir.as_ref();
        let device = Device::Cpu;

        let tokenizer_path = require_file(model_dir, TOKENIZER_FILE)?;
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            DomainError::configuration(format!(
                "Tokenizer load failed at {}: {}",
                tokenizer_path.display(),
                e
            ))
        })?;

        let config_path = require_file(model_dir, CONFIG_FILE)?;
        let raw_config = std::fs::read(&config_path).map_err(|e| {
            DomainError::configuration(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        let config: Gpt2Config = serde_json::from_slice(&raw_config).map_err(|e| {
            DomainError::configuration(format!("Invalid {}: {}", config_path.display(), e))
        })?;

        let weights_path = require_file(model_dir, WEIGHTS_FILE)?;
        // SAFETY: the checkpoint is memory-mapped read-only and not modified
        // while the process runs.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&weights_path], DType::F32, &device).map_err(
                |e| {
                    DomainError::configuration(format!(
                        "Failed to load {}: {}",
                        weights_path.display(),
                        e
                    ))
                },
            )?
        };
        let network = Gpt2::load(config, vb).map_err(|e| {
            DomainError::configuration(format!("GPT-2 weight load failed: {}", e))
        })?;

        let name = model_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "gpt2".to_string());

        info!(
            model = %name,
            layers = network.config().n_layer,
            vocab_size = network.config().vocab_size,
            "Language model loaded"
        );

        Ok(Self {
            name,
            tokenizer,
            network,
        })
    }
}

fn require_file(dir: &Path, file: &str) -> Result<PathBuf, DomainError> {
    let path = dir.join(file);
    if path.is_file() {
        Ok(path)
    } else {
        Err(DomainError::configuration(format!(
            "Model file missing: {}",
            path.display()
        )))
    }
}

impl LanguageModel for LocalGpt2Model {
    fn encode(&self, text: &str) -> Result<Vec<u32>, DomainError> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| DomainError::generation(format!("Tokenization failed: {}", e)))?;

        Ok(encoding.get_ids().to_vec())
    }

    fn next_token_probabilities(
        &self,
        input_ids: &[u32],
        attention_mask: &[u32],
    ) -> Result<Vec<f32>, DomainError> {
        self.network
            .next_token_probabilities(input_ids, attention_mask)
            .map_err(|e| DomainError::generation(format!("Model forward pass failed: {}", e)))
    }

    fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String, DomainError> {
        self.tokenizer
            .decode(ids, skip_special_tokens)
            .map_err(|e| DomainError::generation(format!("Decoding failed: {}", e)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
