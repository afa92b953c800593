use thiserror::Error;

use crate::inference::InferenceError;
use crate::retriever::RetrieverError;

#[derive(Debug, Error)]
/// Errors surfaced by a pipeline run.
pub enum PipelineError {
    /// The retrieval stage failed.
    #[error("retrieval stage failed: {0}")]
    Retriever(#[from] RetrieverError),

    /// The inference stage failed.
    #[error("inference stage failed: {0}")]
    Inference(#[from] InferenceError),

    /// The pipeline was constructed with an invalid configuration.
    #[error("invalid pipeline configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the configuration.
        reason: String,
    },
}

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
