//! Retrieve-then-infer orchestration.
//!
//! A [`CodePipeline`] wires a [`Retriever`] to a [`CodeInference`]
//! strategy: retrieve candidates for the input, drop low-score hits,
//! record the stages in an optional [`AuditTrail`], and hand the
//! survivors to the model. Inference always runs, even when the filter
//! leaves nothing; strategies own the empty-candidate behavior.

pub mod config;
pub mod error;
pub mod types;

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::audit::{AuditTrail, ModelAudit, RetrievalAudit, RetrievalCandidate};
use crate::inference::CodeInference;
use crate::retriever::{RetrievedConcept, Retriever};

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use types::InferenceResult;

/// Orchestrates retrieval, filtering, auditing, and inference.
pub struct CodePipeline<R: Retriever, M: CodeInference> {
    retriever: R,
    model: M,
    config: PipelineConfig,
    model_params: BTreeMap<String, String>,
}

impl<R: Retriever, M: CodeInference> CodePipeline<R, M> {
    /// Builds a pipeline, rejecting invalid configurations up front.
    pub fn new(retriever: R, model: M, config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;

        let model_params = BTreeMap::from([
            ("top_k".to_string(), config.top_k.to_string()),
            (
                "min_retrieval_score".to_string(),
                config.min_retrieval_score.to_string(),
            ),
        ]);

        Ok(Self {
            retriever,
            model,
            config,
            model_params,
        })
    }

    /// Records extra inference-strategy metadata (provider, temperature,
    /// deployment) in the trail's model section. Caller entries override
    /// the config-derived ones on key collision.
    pub fn with_model_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.model_params.extend(params);
        self
    }

    /// Returns the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the pipeline for one input.
    ///
    /// When `audit` is given, the retrieval record holds the unfiltered
    /// candidate list and both stage records are written before the
    /// model is called, so a failed inference still leaves a usable
    /// trail. The returned result embeds a snapshot of the trail.
    pub async fn run(
        &self,
        input_text: &str,
        mut audit: Option<&mut AuditTrail>,
    ) -> PipelineResult<InferenceResult> {
        let candidates = self
            .retriever
            .retrieve(input_text, self.config.top_k)
            .await?;

        let filtered: Vec<RetrievedConcept> = candidates
            .iter()
            .filter(|c| c.score >= self.config.min_retrieval_score)
            .cloned()
            .collect();

        debug!(
            retriever = self.retriever.name(),
            retrieved = candidates.len(),
            kept = filtered.len(),
            min_retrieval_score = self.config.min_retrieval_score,
            "retrieval stage complete"
        );

        if let Some(trail) = audit.as_deref_mut() {
            trail.retrieval = Some(RetrievalAudit {
                retriever_name: self.retriever.name().to_string(),
                retriever_version: self.retriever.version().to_string(),
                top_k: self.config.top_k,
                min_retrieval_score: self.config.min_retrieval_score,
                candidates: candidates
                    .iter()
                    .map(|c| RetrievalCandidate {
                        code: c.concept.code.clone(),
                        description: c.concept.description.clone(),
                        retrieval_score: c.score,
                    })
                    .collect(),
            });
            trail.model = Some(ModelAudit {
                model_name: self.model.model_name().to_string(),
                model_version: self.model.model_version().to_string(),
                params: self.model_params.clone(),
            });
        }

        let inferred = self.model.infer_codes(input_text, &filtered).await?;

        info!(
            model = self.model.model_name(),
            inferred = inferred.len(),
            "inference stage complete"
        );

        Ok(InferenceResult {
            input_text: input_text.to_string(),
            inferred,
            audit: audit.map(|trail| trail.clone()),
        })
    }
}
