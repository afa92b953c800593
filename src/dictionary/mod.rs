//! Concept dictionary: the immutable (code, description, metadata) entries
//! every retrieval run ranks against.
//!
//! A dictionary may carry several entries sharing one code (synonyms);
//! each is a distinct [`Concept`]. Loading and schema validation live in
//! [`loader`]; the retrieval core assumes the loader already produced a
//! validated, non-empty sequence.

pub mod error;
pub mod loader;

pub use error::{DictionaryError, DictionaryResult};
pub use loader::{
    CsvSchema, InputCsvSchema, load_concepts_from_csv, load_concepts_from_str,
    load_inputs_from_csv, load_inputs_from_str,
};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One dictionary entry. Identity is `code`; duplicates by code are
/// synonyms, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Billing code.
    pub code: String,
    /// Human-readable description of the code.
    pub description: String,
    /// Extra CSV columns, keyed by column name. Sorted for stable
    /// serialization.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Concept {
    /// Creates a concept without metadata.
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            metadata: BTreeMap::new(),
        }
    }
}

/// One free-text input unit (e.g. a policy document) to run the pipeline on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// External identifier of the input.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The free text handed to retrieval and inference.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concept_serializes_metadata_as_map() {
        let mut concept = Concept::new("A1", "knee x-ray");
        concept
            .metadata
            .insert("category".to_string(), "imaging".to_string());

        let json = serde_json::to_value(&concept).unwrap();
        assert_eq!(json["metadata"]["category"], "imaging");
    }
}
