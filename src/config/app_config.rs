use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::GenerationConfig;
use crate::infrastructure::cache::CacheConfig;
use crate::infrastructure::search::SearchConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub cache: CacheConfig,
    pub search: SearchConfig,
    pub generation: GenerationSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    /// Single-line output on stderr
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Only origin allowed to call the API from a browser
    pub allowed_origin: String,
}

/// Model location and decoding limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Directory holding `tokenizer.json`, `config.json` and `model.safetensors`
    pub model_dir: PathBuf,
    pub max_input_tokens: usize,
    pub max_new_tokens: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let limits = GenerationConfig::default();

        Self {
            model_dir: PathBuf::from("models/gpt2"),
            max_input_tokens: limits.max_input_tokens,
            max_new_tokens: limits.max_new_tokens,
        }
    }
}

impl GenerationSettings {
    pub fn limits(&self) -> GenerationConfig {
        GenerationConfig {
            max_input_tokens: self.max_input_tokens,
            max_new_tokens: self.max_new_tokens,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::CacheBackend;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.cors.allowed_origin, "http://localhost:3000");
        assert_eq!(config.cache.backend, CacheBackend::File);
        assert_eq!(config.search.timeout_secs, 10);
        assert_eq!(config.generation.limits(), GenerationConfig::default());
    }

    #[test]
    fn test_partial_sources_fall_back_to_defaults() {
        let source = config::Config::builder()
            .set_override("search.timeout_secs", 3)
            .unwrap()
            .set_override("cache.backend", "memory")
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap();

        let config: AppConfig = source.try_deserialize().unwrap();

        assert_eq!(config.search.timeout_secs, 3);
        assert_eq!(config.search.max_snippets, 3);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.generation.max_new_tokens, 50);
    }
}
