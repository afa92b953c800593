use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by inference strategies.
pub enum InferenceError {
    /// The chat provider call failed (transport, auth, provider-side).
    #[error("inference provider error: {message}")]
    Provider {
        /// Provider failure detail.
        message: String,
    },

    /// The provider returned no text content.
    #[error("inference provider returned an empty response")]
    EmptyResponse,

    /// The response text was not the expected JSON shape.
    #[error("malformed inference response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// Convenience result type for inference operations.
pub type CodeInferenceResult<T> = Result<T, InferenceError>;
