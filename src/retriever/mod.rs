//! Retrieval strategies over the concept dictionary.
//!
//! Two implementations of one contract: [`TokenRetriever`] ranks by
//! token-set Jaccard overlap with no external calls; [`EmbeddingRetriever`]
//! ranks by cosine similarity over vectors obtained from an
//! [`EmbeddingClient`](crate::embedding::EmbeddingClient).
//!
//! Both return matches sorted by score descending with ties keeping the
//! original dictionary order. That ordering is load-bearing: `top_k`
//! truncation and the inference strategy's candidate grouping depend on
//! deterministic ranking for reproducible audits.

pub mod embedding;
pub mod error;
pub mod token;
pub mod types;


pub use embedding::EmbeddingRetriever;
pub use error::{RetrieverError, RetrieverResult};
pub use token::TokenRetriever;
pub use types::RetrievedConcept;

use std::sync::Arc;

use async_trait::async_trait;

use crate::dictionary::Concept;

#[async_trait]
/// Ranks a fixed concept dictionary against a query string.
///
/// `index` is meaningful at most once per instance; `retrieve` may be
/// called any number of times afterwards, including concurrently, since
/// it never mutates index state. Calling `retrieve` before indexing (or
/// after indexing an empty dictionary) yields an empty result, not an
/// error.
pub trait Retriever: Send + Sync {
    /// Short strategy identifier recorded in the audit trail.
    fn name(&self) -> &'static str;

    /// Strategy version recorded in the audit trail.
    fn version(&self) -> &'static str;

    /// Builds the index from `concepts`. Re-indexing an already-indexed
    /// instance is a no-op; see the concrete strategies for the exact
    /// semantics.
    async fn index(&self, concepts: Vec<Concept>) -> RetrieverResult<()>;

    /// Returns up to `top_k` matches with score > 0, sorted score
    /// descending, stable on dictionary order. `top_k` is clamped to 1.
    async fn retrieve(&self, query: &str, top_k: usize) -> RetrieverResult<Vec<RetrievedConcept>>;
}

#[async_trait]
impl<T: Retriever + ?Sized> Retriever for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn version(&self) -> &'static str {
        (**self).version()
    }

    async fn index(&self, concepts: Vec<Concept>) -> RetrieverResult<()> {
        (**self).index(concepts).await
    }

    async fn retrieve(&self, query: &str, top_k: usize) -> RetrieverResult<Vec<RetrievedConcept>> {
        (**self).retrieve(query, top_k).await
    }
}

/// Sorts scored index positions by score descending. `sort_by` is stable,
/// so equal scores keep ascending dictionary order.
pub(crate) fn rank_descending(scored: &mut [(f32, usize)]) {
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
}
