//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `MEDCODE_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;

use crate::constants::{
    DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_BATCH_SIZE, DEFAULT_EMBEDDING_ENDPOINT,
    DEFAULT_EMBEDDING_MODEL, DEFAULT_MIN_RETRIEVAL_SCORE, DEFAULT_TOP_K,
};

/// Which retrieval strategy to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrieverKind {
    /// Token-overlap scoring, no external calls.
    Token,
    /// Cosine similarity over provider embeddings.
    Embedding,
}

impl std::str::FromStr for RetrieverKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "embedding" => Ok(Self::Embedding),
            _ => Err(ConfigError::InvalidRetrieverKind {
                value: s.to_string(),
            }),
        }
    }
}

/// Which inference strategy to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceKind {
    /// Deterministic candidate promotion, no external calls.
    Mock,
    /// Chat-model-backed inference.
    Llm,
}

impl std::str::FromStr for InferenceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "llm" => Ok(Self::Llm),
            _ => Err(ConfigError::InvalidInferenceKind {
                value: s.to_string(),
            }),
        }
    }
}

/// Runtime configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `MEDCODE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Retrieval strategy. Default: `token`.
    pub retriever: RetrieverKind,

    /// Inference strategy. Default: `mock`.
    pub inference: InferenceKind,

    /// Provider API key, required for the embedding retriever.
    pub api_key: Option<String>,

    /// Embeddings endpoint URL.
    pub embedding_endpoint: String,

    /// Embedding model name.
    pub embedding_model: String,

    /// Concept descriptions per embedding request. Default: `128`.
    pub embedding_batch_size: usize,

    /// Chat model used by the llm inference strategy.
    pub chat_model: String,

    /// Candidate count requested from the retriever. Default: `15`.
    pub top_k: usize,

    /// Retrieval score threshold applied before inference. Default: `0.05`.
    pub min_retrieval_score: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retriever: RetrieverKind::Token,
            inference: InferenceKind::Mock,
            api_key: None,
            embedding_endpoint: DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_batch_size: DEFAULT_EMBEDDING_BATCH_SIZE,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            top_k: DEFAULT_TOP_K,
            min_retrieval_score: DEFAULT_MIN_RETRIEVAL_SCORE,
        }
    }
}

impl Config {
    pub const ENV_RETRIEVER: &'static str = "MEDCODE_RETRIEVER";
    pub const ENV_INFERENCE: &'static str = "MEDCODE_INFERENCE";
    pub const ENV_API_KEY: &'static str = "MEDCODE_API_KEY";
    pub const ENV_EMBEDDING_ENDPOINT: &'static str = "MEDCODE_EMBEDDING_ENDPOINT";
    pub const ENV_EMBEDDING_MODEL: &'static str = "MEDCODE_EMBEDDING_MODEL";
    pub const ENV_EMBEDDING_BATCH_SIZE: &'static str = "MEDCODE_EMBEDDING_BATCH_SIZE";
    pub const ENV_CHAT_MODEL: &'static str = "MEDCODE_CHAT_MODEL";
    pub const ENV_TOP_K: &'static str = "MEDCODE_TOP_K";
    pub const ENV_MIN_RETRIEVAL_SCORE: &'static str = "MEDCODE_MIN_RETRIEVAL_SCORE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let retriever = Self::parse_kind_from_env(Self::ENV_RETRIEVER, defaults.retriever)?;
        let inference = Self::parse_kind_from_env(Self::ENV_INFERENCE, defaults.inference)?;
        let api_key = Self::parse_optional_string_from_env(Self::ENV_API_KEY);
        let embedding_endpoint =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_ENDPOINT, defaults.embedding_endpoint);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let embedding_batch_size = Self::parse_usize_from_env(
            Self::ENV_EMBEDDING_BATCH_SIZE,
            defaults.embedding_batch_size,
        )?;
        let chat_model = Self::parse_string_from_env(Self::ENV_CHAT_MODEL, defaults.chat_model);
        let top_k = Self::parse_usize_from_env(Self::ENV_TOP_K, defaults.top_k)?;
        let min_retrieval_score = Self::parse_f32_from_env(
            Self::ENV_MIN_RETRIEVAL_SCORE,
            defaults.min_retrieval_score,
        )?;

        Ok(Self {
            retriever,
            inference,
            api_key,
            embedding_endpoint,
            embedding_model,
            embedding_batch_size,
            chat_model,
            top_k,
            min_retrieval_score,
        })
    }

    /// Validates cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_TOP_K,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.embedding_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_BATCH_SIZE,
                reason: "must be at least 1".to_string(),
            });
        }

        if !self.min_retrieval_score.is_finite() || self.min_retrieval_score < 0.0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MIN_RETRIEVAL_SCORE,
                reason: format!(
                    "must be a finite non-negative number, got {}",
                    self.min_retrieval_score
                ),
            });
        }

        if self.retriever == RetrieverKind::Embedding && self.api_key.is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_API_KEY,
            });
        }

        Ok(())
    }

    fn parse_kind_from_env<K>(var_name: &'static str, default: K) -> Result<K, ConfigError>
    where
        K: std::str::FromStr<Err = ConfigError>,
    {
        match env::var(var_name) {
            Ok(value) => value.parse(),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::IntParseError {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_f32_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::FloatParseError {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }
}
