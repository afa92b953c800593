//! Deterministic embedding client for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::EmbeddingClient;
use super::error::EmbeddingResult;
use crate::constants::MOCK_EMBEDDING_DIM;

/// Hash-seeded unit vectors: identical texts embed identically, distinct
/// texts almost surely differ. Counts batch calls so tests can assert the
/// one-shot indexing contract.
#[derive(Debug, Default)]
pub struct MockEmbeddingClient {
    calls: AtomicUsize,
}

impl MockEmbeddingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `embed_batch` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Deterministic normalized vector for `text`.
    pub fn vector_for(text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut embedding = Vec::with_capacity(MOCK_EMBEDDING_DIM);
        for _ in 0..MOCK_EMBEDDING_DIM {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }
        embedding
    }
}

#[async_trait]
impl EmbeddingClient for MockEmbeddingClient {
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_embeddings_are_deterministic() {
        let client = MockEmbeddingClient::new();
        let texts = vec!["knee x-ray".to_string()];

        let first = client.embed_batch(&texts).await.unwrap();
        let second = client.embed_batch(&texts).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_embeddings_are_normalized() {
        let client = MockEmbeddingClient::new();
        let vectors = client
            .embed_batch(&["some text".to_string()])
            .await
            .unwrap();

        let norm: f32 = vectors[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_distinct_texts_get_distinct_vectors() {
        let client = MockEmbeddingClient::new();
        let vectors = client
            .embed_batch(&["alpha".to_string(), "beta".to_string()])
            .await
            .unwrap();

        assert_ne!(vectors[0], vectors[1]);
    }
}
