use serde::{Deserialize, Serialize};

use crate::dictionary::Concept;
use crate::inference::InferredCode;
use crate::retriever::RetrievedConcept;

/// Inferred codes classified against a ground-truth code set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceCrossReference {
    /// Inferred codes whose code appears in the ground truth.
    pub correct_codes: Vec<InferredCode>,
    /// Inferred codes absent from the ground truth.
    pub wrong_codes: Vec<InferredCode>,
    /// Ground-truth concepts whose code was never inferred.
    pub missed_codes: Vec<Concept>,
}

/// Retrieval candidates classified against a ground-truth code set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalCrossReference {
    /// Candidates whose code appears in the ground truth.
    pub correct_codes: Vec<RetrievedConcept>,
    /// Candidates absent from the ground truth.
    pub wrong_codes: Vec<RetrievedConcept>,
    /// Ground-truth concepts no candidate carried.
    pub missed_codes: Vec<Concept>,
}

/// Where the two stages disagree about the same run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalInferenceCrossCheck {
    /// Codes retrieval got right but inference dropped. Likely
    /// inference-stage failures.
    pub missed_inference_codes: Vec<RetrievedConcept>,
    /// Bad candidates retrieval surfaced that inference did not repeat.
    /// A desirable filtering outcome, not an error.
    pub excluded_wrong_inference_codes: Vec<RetrievedConcept>,
}
