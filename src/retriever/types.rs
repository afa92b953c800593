use serde::{Deserialize, Serialize};

use crate::dictionary::Concept;

/// One scored match produced by a retriever for one query.
///
/// Ephemeral: lives for the duration of a pipeline run and is only
/// persisted through the audit trail's candidate list. The score is in
/// the retriever's native range (Jaccard `[0, 1]`, cosine `[-1, 1]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedConcept {
    /// The matched dictionary entry.
    pub concept: Concept,
    /// Similarity between the query and the concept description.
    pub score: f32,
}

impl RetrievedConcept {
    pub fn new(concept: Concept, score: f32) -> Self {
        Self { concept, score }
    }
}
