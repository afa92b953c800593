use serde::{Deserialize, Serialize};

/// One code selected by an inference strategy.
///
/// A run's output is ranked by `score` descending and carries each code
/// at most once; synonym duplicates are merged by the strategy before
/// this record is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferredCode {
    /// Billing code.
    pub code: String,
    /// Strategy confidence in `[0, 1]`.
    pub confidence: f32,
    /// Ranking score (often equal to `confidence`).
    pub score: f32,
    /// Concept descriptions that supported the selection, best first.
    pub matched_concepts: Vec<String>,
    /// Short human-readable rationale.
    pub justification: String,
}
