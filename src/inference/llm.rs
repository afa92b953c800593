//! Provider-backed inference through the `genai` chat client.
//!
//! The prompt carries the input text plus a compact, ranked candidate
//! list and demands strict JSON back. Unlike the mock, a provider model
//! may return codes even for an empty candidate list (prior knowledge);
//! the orchestrator deliberately does not prevent that.

use std::collections::HashMap;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CodeInference;
use super::error::{CodeInferenceResult, InferenceError};
use super::types::InferredCode;
use crate::retriever::RetrievedConcept;

/// Max distinct codes included in the prompt.
const PROMPT_MAX_CODES: usize = 30;
/// Max synonym descriptions per code in the prompt.
const PROMPT_MAX_PER_CODE: usize = 2;

const SYSTEM_PROMPT: &str = "You are a medical coding assistant.\n\
    You will be given policy text and a list of candidate code+concept pairs.\n\
    Your job is to select the best matching codes.\n\
    Return ONLY valid JSON. No markdown. No extra text.\n";

const SCHEMA_EXAMPLE: &str = r#"{"inferred":[{"code":"12345","confidence":0.12,"score":0.12,"matched_concepts":["..."],"justification":"..."}]}"#;

/// One code entry as presented to the model.
#[derive(Debug, Serialize, PartialEq)]
struct PromptCandidate {
    code: String,
    concepts: Vec<String>,
    best_retrieval_score: f32,
}

#[derive(Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    inferred: Vec<ResponseItem>,
}

#[derive(Deserialize)]
struct ResponseItem {
    #[serde(default)]
    code: String,
    #[serde(default)]
    confidence: f32,
    score: Option<f32>,
    #[serde(default)]
    matched_concepts: Vec<String>,
    #[serde(default)]
    justification: String,
}

/// Chat-model-backed implementation of [`CodeInference`].
pub struct LlmCodeInference {
    client: Client,
    model: String,
}

impl std::fmt::Debug for LlmCodeInference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmCodeInference")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmCodeInference {
    /// Creates a strategy using the default `genai` client, which reads
    /// provider credentials from the environment.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    /// Returns the configured chat model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CodeInference for LlmCodeInference {
    fn model_name(&self) -> &'static str {
        "LlmCodeInference"
    }

    fn model_version(&self) -> &'static str {
        "1.0"
    }

    async fn infer_codes(
        &self,
        input_text: &str,
        candidates: &[RetrievedConcept],
    ) -> CodeInferenceResult<Vec<InferredCode>> {
        let grouped = group_candidates(candidates, PROMPT_MAX_CODES, PROMPT_MAX_PER_CODE);
        let user_prompt = build_user_prompt(input_text, &grouped)?;

        debug!(
            model = %self.model,
            candidate_codes = grouped.len(),
            "requesting code inference"
        );

        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| InferenceError::Provider {
                message: e.to_string(),
            })?;

        let content = response.first_text().unwrap_or_default().trim().to_string();
        if content.is_empty() {
            return Err(InferenceError::EmptyResponse);
        }

        parse_response(&content)
    }
}

/// Compacts candidates for the prompt: group by code, keep the top
/// `max_per_code` synonyms by retrieval score, rank codes by their best
/// score, cap at `max_codes`.
fn group_candidates(
    candidates: &[RetrievedConcept],
    max_codes: usize,
    max_per_code: usize,
) -> Vec<PromptCandidate> {
    let mut order: Vec<String> = Vec::new();
    let mut by_code: HashMap<String, Vec<&RetrievedConcept>> = HashMap::new();
    for candidate in candidates {
        let bucket = by_code.entry(candidate.concept.code.clone()).or_default();
        if bucket.is_empty() {
            order.push(candidate.concept.code.clone());
        }
        bucket.push(candidate);
    }

    let mut items: Vec<PromptCandidate> = order
        .into_iter()
        .map(|code| {
            let mut hits = by_code.remove(&code).unwrap_or_default();
            hits.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            hits.truncate(max_per_code);

            PromptCandidate {
                code,
                best_retrieval_score: hits.first().map(|h| h.score).unwrap_or(0.0),
                concepts: hits
                    .iter()
                    .map(|h| h.concept.description.clone())
                    .collect(),
            }
        })
        .collect();

    items.sort_by(|a, b| {
        b.best_retrieval_score
            .partial_cmp(&a.best_retrieval_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    items.truncate(max_codes);
    items
}

fn build_user_prompt(
    input_text: &str,
    candidates: &[PromptCandidate],
) -> CodeInferenceResult<String> {
    let candidates_json = serde_json::to_string(candidates)?;

    Ok(format!(
        "POLICY TEXT:\n{input_text}\n\n\
         CANDIDATE CODES (ranked):\n{candidates_json}\n\n\
         Return JSON with this exact shape:\n{SCHEMA_EXAMPLE}\n\n\
         Rules:\n\
         - Choose up to 25 codes.\n\
         - confidence and score must be numbers between 0 and 1.\n\
         - matched_concepts must be drawn from the candidate concepts.\n\
         - justification must be short and specific.\n\
         - Return ONLY JSON.\n"
    ))
}

/// Parses the model's JSON reply into ranked, code-unique records.
fn parse_response(content: &str) -> CodeInferenceResult<Vec<InferredCode>> {
    let envelope: ResponseEnvelope = serde_json::from_str(strip_code_fences(content))?;

    let mut inferred: Vec<InferredCode> = envelope
        .inferred
        .into_iter()
        .filter_map(|item| {
            let code = item.code.trim().to_string();
            if code.is_empty() {
                return None;
            }

            let confidence = item.confidence.clamp(0.0, 1.0);
            Some(InferredCode {
                code,
                confidence,
                score: item.score.unwrap_or(confidence),
                matched_concepts: item.matched_concepts,
                justification: item.justification.trim().to_string(),
            })
        })
        .collect();

    inferred.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Codes must be unique within one run; keep the best-scoring entry.
    let mut seen = std::collections::HashSet::new();
    inferred.retain(|item| seen.insert(item.code.clone()));

    Ok(inferred)
}

/// Some providers wrap JSON in a markdown fence despite instructions.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Concept;

    fn candidate(code: &str, description: &str, score: f32) -> RetrievedConcept {
        RetrievedConcept::new(Concept::new(code, description), score)
    }

    #[test]
    fn test_group_candidates_ranks_and_caps() {
        let candidates = vec![
            candidate("A1", "low match", 0.1),
            candidate("B2", "best match", 0.9),
            candidate("B2", "second synonym", 0.8),
            candidate("B2", "third synonym", 0.7),
        ];

        let grouped = group_candidates(&candidates, 30, 2);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].code, "B2");
        assert_eq!(grouped[0].best_retrieval_score, 0.9);
        assert_eq!(grouped[0].concepts, vec!["best match", "second synonym"]);
        assert_eq!(grouped[1].code, "A1");
    }

    #[test]
    fn test_group_candidates_caps_code_count() {
        let candidates: Vec<_> = (0..40)
            .map(|i| candidate(&format!("C{i}"), "desc", 1.0 - i as f32 / 100.0))
            .collect();

        let grouped = group_candidates(&candidates, 30, 2);
        assert_eq!(grouped.len(), 30);
    }

    #[test]
    fn test_build_user_prompt_embeds_text_and_candidates() {
        let grouped = group_candidates(&[candidate("A1", "knee x-ray", 0.5)], 30, 2);
        let prompt = build_user_prompt("knee pain imaging policy", &grouped).unwrap();

        assert!(prompt.contains("POLICY TEXT:\nknee pain imaging policy"));
        assert!(prompt.contains("\"code\":\"A1\""));
        assert!(prompt.contains("Return ONLY JSON."));
    }

    #[test]
    fn test_parse_response_happy_path() {
        let content = r#"{"inferred":[{"code":"A1","confidence":0.8,"score":0.8,"matched_concepts":["knee x-ray"],"justification":"matches imaging"}]}"#;

        let inferred = parse_response(content).unwrap();

        assert_eq!(inferred.len(), 1);
        assert_eq!(inferred[0].code, "A1");
        assert_eq!(inferred[0].confidence, 0.8);
        assert_eq!(inferred[0].matched_concepts, vec!["knee x-ray"]);
    }

    #[test]
    fn test_parse_response_defaults_score_to_confidence() {
        let content = r#"{"inferred":[{"code":"A1","confidence":0.7}]}"#;
        let inferred = parse_response(content).unwrap();

        assert_eq!(inferred[0].score, 0.7);
        assert!(inferred[0].matched_concepts.is_empty());
    }

    #[test]
    fn test_parse_response_skips_empty_codes_and_clamps_confidence() {
        let content = r#"{"inferred":[
            {"code":"  ","confidence":0.5},
            {"code":"A1","confidence":1.7},
            {"code":"B2","confidence":-0.2}
        ]}"#;

        let inferred = parse_response(content).unwrap();

        assert_eq!(inferred.len(), 2);
        assert_eq!(inferred[0].confidence, 1.0);
        assert_eq!(inferred[1].confidence, 0.0);
    }

    #[test]
    fn test_parse_response_dedupes_codes_keeping_best_score() {
        let content = r#"{"inferred":[
            {"code":"A1","confidence":0.3,"score":0.3},
            {"code":"A1","confidence":0.9,"score":0.9}
        ]}"#;

        let inferred = parse_response(content).unwrap();

        assert_eq!(inferred.len(), 1);
        assert_eq!(inferred[0].score, 0.9);
    }

    #[test]
    fn test_parse_response_sorted_descending() {
        let content = r#"{"inferred":[
            {"code":"A1","confidence":0.2},
            {"code":"B2","confidence":0.9},
            {"code":"C3","confidence":0.5}
        ]}"#;

        let inferred = parse_response(content).unwrap();

        let codes: Vec<_> = inferred.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["B2", "C3", "A1"]);
    }

    #[test]
    fn test_parse_response_tolerates_markdown_fence() {
        let content = "```json\n{\"inferred\":[{\"code\":\"A1\",\"confidence\":0.4}]}\n```";
        let inferred = parse_response(content).unwrap();
        assert_eq!(inferred[0].code, "A1");
    }

    #[test]
    fn test_parse_response_rejects_non_json() {
        let err = parse_response("I think the code is A1.").unwrap_err();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_response_empty_envelope() {
        let inferred = parse_response(r#"{"inferred":[]}"#).unwrap();
        assert!(inferred.is_empty());

        let inferred = parse_response(r#"{}"#).unwrap();
        assert!(inferred.is_empty());
    }
}
