//! Embedding capability consumed by the embedding retriever.

pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod openai;

pub use config::EmbeddingConfig;
pub use error::{EmbeddingError, EmbeddingResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingClient;
pub use openai::OpenAiEmbeddingClient;

use async_trait::async_trait;

#[async_trait]
/// Turns text into vectors. Implementations own their transport and any
/// retry policy; the retriever never retries on their behalf.
pub trait EmbeddingClient: Send + Sync {
    /// Embeds `texts`, returning one vector per input in input order.
    /// Implementations may return fewer vectors on provider misbehavior;
    /// the caller is responsible for the count integrity check.
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>>;

    /// Embeds a single text.
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let input = [text.to_string()];
        let mut vectors = self.embed_batch(&input).await?;
        vectors.pop().ok_or_else(|| EmbeddingError::MalformedResponse {
            reason: "provider returned no vector for a single-text request".to_string(),
        })
    }
}
