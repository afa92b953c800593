//! Audit trail records for inference runs.
//!
//! Every pipeline run can carry an [`AuditTrail`] that captures what the
//! run saw before any post-filtering: the input fingerprint, the loaded
//! dictionary, the full retrieval candidate list, and the model identity
//! with its parameters. The trail is plain serializable data so callers
//! can persist it next to the run output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::hashing::hash_input_text;

/// Dictionary provenance for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryAudit {
    /// Number of concept rows loaded.
    pub row_count: usize,
    /// Column names the loader mapped, in schema order.
    pub schema: Vec<String>,
}

/// One retrieval hit as recorded in the trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalCandidate {
    pub code: String,
    pub description: String,
    pub retrieval_score: f32,
}

/// Retrieval stage record.
///
/// `candidates` holds the retriever output before the score filter is
/// applied, so the trail shows what inference could have seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalAudit {
    pub retriever_name: String,
    pub retriever_version: String,
    pub top_k: usize,
    pub min_retrieval_score: f32,
    pub candidates: Vec<RetrievalCandidate>,
}

/// Model identity and parameters for the inference stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAudit {
    pub model_name: String,
    pub model_version: String,
    /// Free-form strategy parameters, keyed for stable serialization.
    pub params: BTreeMap<String, String>,
}

/// Full audit record for a single inference run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    /// Unique id for this run.
    pub run_id: String,
    /// RFC 3339 UTC timestamp taken when the trail was created.
    pub timestamp_utc: String,
    /// Content hash of the input text.
    pub input_hash: String,
    /// Build and host fingerprint.
    pub environment: BTreeMap<String, String>,
    pub dictionary: Option<DictionaryAudit>,
    pub retrieval: Option<RetrievalAudit>,
    pub model: Option<ModelAudit>,
}

impl AuditTrail {
    /// Creates a trail with explicit identity fields.
    ///
    /// Prefer [`AuditTrail::for_input`]; this constructor exists so tests
    /// and replay tooling can build deterministic trails.
    pub fn new(
        run_id: impl Into<String>,
        timestamp_utc: impl Into<String>,
        input_hash: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            timestamp_utc: timestamp_utc.into(),
            input_hash: input_hash.into(),
            environment: env_fingerprint(),
            dictionary: None,
            retrieval: None,
            model: None,
        }
    }

    /// Creates a trail for `input_text` with a fresh run id and the
    /// current UTC timestamp.
    pub fn for_input(input_text: &str) -> Self {
        Self::new(new_run_id(), utc_now_iso(), hash_input_text(input_text))
    }

    /// Attaches dictionary provenance.
    pub fn with_dictionary(mut self, row_count: usize, schema: Vec<String>) -> Self {
        self.dictionary = Some(DictionaryAudit { row_count, schema });
        self
    }

    /// Adds one entry to the environment fingerprint, e.g. a content
    /// hash of a source file the run depends on.
    pub fn with_environment(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }
}

/// Generates a fresh run id.
pub fn new_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current UTC time as an RFC 3339 string.
pub fn utc_now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Build and host fingerprint recorded on every trail.
pub fn env_fingerprint() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "package_version".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        ),
        ("os".to_string(), std::env::consts::OS.to_string()),
        ("arch".to_string(), std::env::consts::ARCH.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_input_hashes_text_and_sets_identity() {
        let trail = AuditTrail::for_input("knee pain policy");

        assert_eq!(trail.input_hash, hash_input_text("knee pain policy"));
        assert_eq!(trail.input_hash.len(), 64);
        assert!(!trail.run_id.is_empty());
        assert!(!trail.timestamp_utc.is_empty());
        assert!(trail.dictionary.is_none());
        assert!(trail.retrieval.is_none());
        assert!(trail.model.is_none());
    }

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(new_run_id(), new_run_id());
    }

    #[test]
    fn test_environment_fingerprint_keys() {
        let env = env_fingerprint();
        assert!(env.contains_key("package_version"));
        assert!(env.contains_key("os"));
        assert!(env.contains_key("arch"));
    }

    #[test]
    fn test_with_environment_records_file_hash() {
        let csv = b"code,description\nA1,knee x-ray\n";
        let trail = AuditTrail::new("run-1", "2026-01-01T00:00:00Z", "abc")
            .with_environment("dictionary_hash", crate::hashing::hash_input_bytes(csv));

        let hash = &trail.environment["dictionary_hash"];
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, &crate::hashing::hash_input_bytes(csv));
        // Built-in fingerprint keys are untouched.
        assert!(trail.environment.contains_key("os"));
    }

    #[test]
    fn test_with_dictionary_records_rows_and_schema() {
        let trail = AuditTrail::new("run-1", "2026-01-01T00:00:00Z", "abc")
            .with_dictionary(42, vec!["code".to_string(), "description".to_string()]);

        let dictionary = trail.dictionary.unwrap();
        assert_eq!(dictionary.row_count, 42);
        assert_eq!(dictionary.schema, vec!["code", "description"]);
    }

    #[test]
    fn test_trail_round_trips_through_json() {
        let mut trail = AuditTrail::new("run-1", "2026-01-01T00:00:00Z", "abc");
        trail.retrieval = Some(RetrievalAudit {
            retriever_name: "token".to_string(),
            retriever_version: "1.0".to_string(),
            top_k: 15,
            min_retrieval_score: 0.05,
            candidates: vec![RetrievalCandidate {
                code: "A1".to_string(),
                description: "knee x-ray".to_string(),
                retrieval_score: 0.5,
            }],
        });
        trail.model = Some(ModelAudit {
            model_name: "MockCodeInference".to_string(),
            model_version: "1.0".to_string(),
            params: BTreeMap::from([("top_k".to_string(), "15".to_string())]),
        });

        let json = serde_json::to_string(&trail).unwrap();
        let back: AuditTrail = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trail);
    }
}
