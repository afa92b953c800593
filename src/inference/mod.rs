//! Code inference strategies.
//!
//! A strategy turns an input text plus its retrieval candidates into a
//! ranked list of [`InferredCode`] records. [`MockCodeInference`] is the
//! deterministic offline baseline; [`LlmCodeInference`] delegates to a
//! chat model.

pub mod error;
pub mod llm;
pub mod mock;
pub mod types;

use async_trait::async_trait;

pub use error::{CodeInferenceResult, InferenceError};
pub use llm::LlmCodeInference;
pub use mock::MockCodeInference;
pub use types::InferredCode;

use crate::retriever::RetrievedConcept;

/// Strategy for selecting billing codes from retrieval candidates.
#[async_trait]
pub trait CodeInference: Send + Sync {
    /// Stable strategy name, recorded in audit trails.
    fn model_name(&self) -> &'static str;

    /// Strategy version, recorded in audit trails.
    fn model_version(&self) -> &'static str;

    /// Infers codes for `input_text` given retrieval `candidates`.
    ///
    /// Candidates may be empty; strategies decide what that means. The
    /// output is ranked by `score` descending and holds each code at
    /// most once.
    async fn infer_codes(
        &self,
        input_text: &str,
        candidates: &[RetrievedConcept],
    ) -> CodeInferenceResult<Vec<InferredCode>>;
}

#[async_trait]
impl<T: CodeInference + ?Sized> CodeInference for std::sync::Arc<T> {
    fn model_name(&self) -> &'static str {
        (**self).model_name()
    }

    fn model_version(&self) -> &'static str {
        (**self).model_version()
    }

    async fn infer_codes(
        &self,
        input_text: &str,
        candidates: &[RetrievedConcept],
    ) -> CodeInferenceResult<Vec<InferredCode>> {
        (**self).infer_codes(input_text, candidates).await
    }
}
