//! Crate-wide defaults.
//!
//! Runtime overrides come from `MEDCODE_*` environment variables; see
//! [`crate::config::Config`].

/// Default number of candidates requested from the retriever per run.
pub const DEFAULT_TOP_K: usize = 15;

/// Default minimum retrieval score a candidate needs to reach inference.
pub const DEFAULT_MIN_RETRIEVAL_SCORE: f32 = 0.05;

/// Default number of concept descriptions embedded per API call during indexing.
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 128;

/// Default embedding model name.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default OpenAI-compatible embeddings endpoint.
pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

/// Default chat model used by the LLM inference strategy.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4.1-mini";

/// Dimension of the deterministic mock embedding vectors.
pub const MOCK_EMBEDDING_DIM: usize = 32;
