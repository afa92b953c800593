//! Baseline inference without any external calls.

use std::collections::HashMap;

use async_trait::async_trait;

use super::error::CodeInferenceResult;
use super::types::InferredCode;
use super::CodeInference;
use crate::retriever::RetrievedConcept;

/// Promotes retrieval candidates to inferred codes directly.
///
/// Groups candidates by code, takes the best retrieval score per code as
/// confidence (clamped to `[0.01, 1.0]`) and cites up to three matched
/// descriptions. Deterministic, offline, and the documented baseline for
/// the empty-candidate case: no candidates in, no codes out.
#[derive(Debug, Default)]
pub struct MockCodeInference;

impl MockCodeInference {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CodeInference for MockCodeInference {
    fn model_name(&self) -> &'static str {
        "MockCodeInference"
    }

    fn model_version(&self) -> &'static str {
        "1.0"
    }

    async fn infer_codes(
        &self,
        _input_text: &str,
        candidates: &[RetrievedConcept],
    ) -> CodeInferenceResult<Vec<InferredCode>> {
        // Group by code, preserving first-seen code order.
        let mut order: Vec<String> = Vec::new();
        let mut by_code: HashMap<String, Vec<&RetrievedConcept>> = HashMap::new();
        for candidate in candidates {
            let bucket = by_code.entry(candidate.concept.code.clone()).or_default();
            if bucket.is_empty() {
                order.push(candidate.concept.code.clone());
            }
            bucket.push(candidate);
        }

        let mut inferred: Vec<InferredCode> = Vec::with_capacity(order.len());
        for code in order {
            let mut hits = by_code.remove(&code).unwrap_or_default();
            hits.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let top_score = hits.first().map(|h| h.score).unwrap_or(0.0);
            let confidence = top_score.clamp(0.01, 1.0);

            let matched_concepts: Vec<String> = hits
                .iter()
                .take(3)
                .map(|h| h.concept.description.clone())
                .collect();

            let justification = format!(
                "Matched concept(s) for code {}: {} with confidence {:.2} based on input",
                code,
                matched_concepts
                    .iter()
                    .map(|c| format!("'{c}'"))
                    .collect::<Vec<_>>()
                    .join("; "),
                confidence
            );

            inferred.push(InferredCode {
                code,
                confidence,
                score: confidence,
                matched_concepts,
                justification,
            });
        }

        inferred.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(inferred)
    }
}
