use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by embedding clients.
pub enum EmbeddingError {
    /// No API key was configured for a provider-backed client.
    #[error("embedding API key is not configured (set MEDCODE_API_KEY)")]
    MissingApiKey,

    /// The HTTP request could not be sent or the response not read.
    #[error("embedding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("embedding API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body (possibly truncated).
        message: String,
    },

    /// The provider returned a payload we could not interpret.
    #[error("malformed embedding response: {reason}")]
    MalformedResponse {
        /// Parse failure detail.
        reason: String,
    },
}

/// Convenience result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;
