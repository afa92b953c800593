//! Offline accuracy evaluation.
//!
//! Three pure functions classify a run's inferred codes and retrieval
//! candidates against a known-correct code set. Code identity is exact
//! string equality of the `code` field; the loaders own any
//! normalization. The functions classify outcomes only, they do not
//! reason about why a code was missed.

pub mod types;

use std::collections::HashSet;

use crate::dictionary::Concept;
use crate::inference::InferredCode;
use crate::retriever::RetrievedConcept;

pub use types::{InferenceCrossReference, RetrievalCrossReference, RetrievalInferenceCrossCheck};

/// Classifies inferred codes against ground truth.
///
/// Each inferred code lands in exactly one of `correct_codes` or
/// `wrong_codes`; each ground-truth concept whose code was never
/// inferred lands in `missed_codes`. Input order is preserved.
pub fn cross_reference_inference(
    inferred: &[InferredCode],
    ground_truth: &[Concept],
) -> InferenceCrossReference {
    let truth_codes: HashSet<&str> = ground_truth.iter().map(|c| c.code.as_str()).collect();
    let inferred_codes: HashSet<&str> = inferred.iter().map(|i| i.code.as_str()).collect();

    let (correct_codes, wrong_codes): (Vec<InferredCode>, Vec<InferredCode>) = inferred
        .iter()
        .cloned()
        .partition(|i| truth_codes.contains(i.code.as_str()));

    let missed_codes = ground_truth
        .iter()
        .filter(|c| !inferred_codes.contains(c.code.as_str()))
        .cloned()
        .collect();

    InferenceCrossReference {
        correct_codes,
        wrong_codes,
        missed_codes,
    }
}

/// Classifies retrieval candidates against ground truth, same shape as
/// [`cross_reference_inference`].
pub fn cross_reference_retrieval(
    retrieved: &[RetrievedConcept],
    ground_truth: &[Concept],
) -> RetrievalCrossReference {
    let truth_codes: HashSet<&str> = ground_truth.iter().map(|c| c.code.as_str()).collect();
    let retrieved_codes: HashSet<&str> = retrieved
        .iter()
        .map(|r| r.concept.code.as_str())
        .collect();

    let (correct_codes, wrong_codes): (Vec<RetrievedConcept>, Vec<RetrievedConcept>) = retrieved
        .iter()
        .cloned()
        .partition(|r| truth_codes.contains(r.concept.code.as_str()));

    let missed_codes = ground_truth
        .iter()
        .filter(|c| !retrieved_codes.contains(c.code.as_str()))
        .cloned()
        .collect();

    RetrievalCrossReference {
        correct_codes,
        wrong_codes,
        missed_codes,
    }
}

/// Compares the two stage classifications for one run.
///
/// `missed_inference_codes` holds retrieval's correct candidates whose
/// code is not among inference's correct codes: retrieval found the
/// code, inference dropped it. `excluded_wrong_inference_codes` holds
/// retrieval's wrong candidates whose code inference did not repeat.
pub fn cross_check_inference_vs_retrieval(
    inference: &InferenceCrossReference,
    retrieval: &RetrievalCrossReference,
) -> RetrievalInferenceCrossCheck {
    let inferred_correct: HashSet<&str> = inference
        .correct_codes
        .iter()
        .map(|i| i.code.as_str())
        .collect();
    let inferred_wrong: HashSet<&str> = inference
        .wrong_codes
        .iter()
        .map(|i| i.code.as_str())
        .collect();

    let missed_inference_codes = retrieval
        .correct_codes
        .iter()
        .filter(|r| !inferred_correct.contains(r.concept.code.as_str()))
        .cloned()
        .collect();

    let excluded_wrong_inference_codes = retrieval
        .wrong_codes
        .iter()
        .filter(|r| !inferred_wrong.contains(r.concept.code.as_str()))
        .cloned()
        .collect();

    RetrievalInferenceCrossCheck {
        missed_inference_codes,
        excluded_wrong_inference_codes,
    }
}
