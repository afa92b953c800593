//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Retriever kind string was not recognized.
    #[error("invalid retriever kind '{value}': expected 'token' or 'embedding'")]
    InvalidRetrieverKind { value: String },

    /// Inference kind string was not recognized.
    #[error("invalid inference kind '{value}': expected 'mock' or 'llm'")]
    InvalidInferenceKind { value: String },

    /// A numeric setting could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    IntParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A float setting could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    FloatParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// A setting parsed but holds a value the system cannot run with.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        reason: String,
    },

    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },
}
