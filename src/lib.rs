//! Medcode library crate (used by the batch binary and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Runtime configuration
//! - [`Concept`], [`InputRecord`] - Dictionary and input data model
//! - [`CodePipeline`], [`PipelineConfig`], [`InferenceResult`] - Orchestration
//!
//! ## Retrieval & Inference
//! - [`TokenRetriever`], [`EmbeddingRetriever`] - Retrieval strategies
//! - [`MockCodeInference`], [`LlmCodeInference`] - Inference strategies
//! - [`OpenAiEmbeddingClient`] - Embedding capability
//!
//! ## Audit & Evaluation
//! - [`AuditTrail`] and its section records
//! - [`cross_reference_inference`], [`cross_reference_retrieval`],
//!   [`cross_check_inference_vs_retrieval`] - Offline accuracy evaluation
//!
//! ## Test/Mock Support
//! [`MockEmbeddingClient`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod audit;
pub mod config;
pub mod constants;
pub mod dictionary;
pub mod embedding;
pub mod evaluation;
pub mod hashing;
pub mod inference;
pub mod pipeline;
pub mod retriever;

pub use audit::{
    AuditTrail, DictionaryAudit, ModelAudit, RetrievalAudit, RetrievalCandidate, env_fingerprint,
    new_run_id, utc_now_iso,
};
pub use config::{Config, ConfigError, InferenceKind, RetrieverKind};
pub use dictionary::{
    Concept, CsvSchema, DictionaryError, InputCsvSchema, InputRecord, load_concepts_from_csv,
    load_concepts_from_str, load_inputs_from_csv, load_inputs_from_str,
};
pub use embedding::{EmbeddingClient, EmbeddingConfig, EmbeddingError, OpenAiEmbeddingClient};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingClient;
pub use evaluation::{
    InferenceCrossReference, RetrievalCrossReference, RetrievalInferenceCrossCheck,
    cross_check_inference_vs_retrieval, cross_reference_inference, cross_reference_retrieval,
};
pub use hashing::{hash_input_bytes, hash_input_text};
pub use inference::{
    CodeInference, InferenceError, InferredCode, LlmCodeInference, MockCodeInference,
};
pub use pipeline::{CodePipeline, InferenceResult, PipelineConfig, PipelineError};
pub use retriever::{
    EmbeddingRetriever, RetrievedConcept, Retriever, RetrieverError, TokenRetriever,
};
