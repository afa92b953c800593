use crate::embedding::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by retrievers.
pub enum RetrieverError {
    /// The embedding capability failed (transport, auth, provider).
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// A batch came back with the wrong number of vectors during indexing.
    /// This is a hard integrity failure, never retried locally.
    #[error("expected {expected} embeddings but got {actual}")]
    IndexIntegrity {
        /// Texts sent in the batch.
        expected: usize,
        /// Vectors received.
        actual: usize,
    },
}

/// Convenience result type for retrieval operations.
pub type RetrieverResult<T> = Result<T, RetrieverError>;
