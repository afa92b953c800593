use crate::constants::{DEFAULT_EMBEDDING_ENDPOINT, DEFAULT_EMBEDDING_MODEL};

/// Configuration for the OpenAI-compatible embedding client.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Bearer token for the embeddings endpoint.
    pub api_key: Option<String>,
    /// Full URL of the embeddings endpoint.
    pub endpoint: String,
    /// Embedding model name sent with each request.
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }
}

impl EmbeddingConfig {
    /// Creates a config with the given key and the default endpoint/model.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }
}
