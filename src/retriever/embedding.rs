//! Embedding retrieval by cosine similarity over precomputed vectors.

use async_trait::async_trait;
use futures_util::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::error::{RetrieverError, RetrieverResult};
use super::types::RetrievedConcept;
use super::{Retriever, rank_descending};
use crate::constants::DEFAULT_EMBEDDING_BATCH_SIZE;
use crate::dictionary::Concept;
use crate::embedding::EmbeddingClient;

struct EmbeddingIndex {
    concepts: Vec<Concept>,
    vectors: Vec<Vec<f32>>,
}

/// Retriever backed by an [`EmbeddingClient`].
///
/// `index` embeds every concept description (batched, one call per
/// batch); `retrieve` embeds the query and ranks by cosine similarity.
/// Both operations perform blocking network I/O through the client.
///
/// Re-indexing is declined: a second `index` call returns without effect,
/// leaving the first index intact. This is declared behavior, not a
/// silent failure — callers may rely on idempotent `index` calls, and
/// rebuilding over new concepts is not supported at this layer.
pub struct EmbeddingRetriever<E: EmbeddingClient> {
    client: E,
    batch_size: usize,
    index: RwLock<Option<EmbeddingIndex>>,
}

impl<E: EmbeddingClient> std::fmt::Debug for EmbeddingRetriever<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingRetriever")
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl<E: EmbeddingClient> EmbeddingRetriever<E> {
    /// Creates a retriever with the default batch size.
    pub fn new(client: E) -> Self {
        Self::with_batch_size(client, DEFAULT_EMBEDDING_BATCH_SIZE)
    }

    /// Creates a retriever embedding `batch_size` descriptions per call
    /// (clamped to 1).
    pub fn with_batch_size(client: E, batch_size: usize) -> Self {
        Self {
            client,
            batch_size: batch_size.max(1),
            index: RwLock::new(None),
        }
    }

    /// Returns the underlying embedding client.
    pub fn client(&self) -> &E {
        &self.client
    }

    /// Returns `true` once an index is in place.
    pub async fn is_indexed(&self) -> bool {
        self.index.read().await.is_some()
    }
}

#[async_trait]
impl<E: EmbeddingClient> Retriever for EmbeddingRetriever<E> {
    fn name(&self) -> &'static str {
        "EmbeddingRetriever"
    }

    fn version(&self) -> &'static str {
        "1.0"
    }

    async fn index(&self, concepts: Vec<Concept>) -> RetrieverResult<()> {
        // The write lock is the mutual-exclusion region: a concurrent
        // second call parks here and then observes the no-op branch, so
        // partially written vector state is never visible.
        let mut guard = self.index.write().await;
        if guard.is_some() {
            warn!("embedding index already built, declining re-index");
            return Ok(());
        }

        let texts: Vec<String> = concepts.iter().map(|c| c.description.clone()).collect();
        let batches: Vec<&[String]> = texts.chunks(self.batch_size).collect();

        debug!(
            concepts = concepts.len(),
            batches = batches.len(),
            batch_size = self.batch_size,
            "building embedding index"
        );

        // join_all preserves input order, so vectors line up 1:1 with
        // concepts even though batches run concurrently.
        let results = join_all(batches.iter().map(|batch| self.client.embed_batch(batch))).await;

        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(concepts.len());
        for (batch, result) in batches.iter().zip(results) {
            let batch_vectors = result?;
            if batch_vectors.len() != batch.len() {
                return Err(RetrieverError::IndexIntegrity {
                    expected: batch.len(),
                    actual: batch_vectors.len(),
                });
            }
            vectors.extend(batch_vectors);
        }

        *guard = Some(EmbeddingIndex { concepts, vectors });
        Ok(())
    }

    async fn retrieve(&self, query: &str, top_k: usize) -> RetrieverResult<Vec<RetrievedConcept>> {
        {
            let guard = self.index.read().await;
            match guard.as_ref() {
                None => return Ok(vec![]),
                Some(index) if index.concepts.is_empty() => return Ok(vec![]),
                Some(_) => {}
            }
        }

        let query_vector = self.client.embed(query).await?;

        let guard = self.index.read().await;
        let Some(index) = guard.as_ref() else {
            return Ok(vec![]);
        };

        let mut scored: Vec<(f32, usize)> = Vec::new();
        for (i, vector) in index.vectors.iter().enumerate() {
            let score = cosine_similarity(&query_vector, vector);
            if score > 0.0 {
                scored.push((score, i));
            }
        }

        rank_descending(&mut scored);
        scored.truncate(top_k.max(1));

        Ok(scored
            .into_iter()
            .map(|(score, i)| RetrievedConcept::new(index.concepts[i].clone(), score))
            .collect())
    }
}

/// Cosine similarity, defined as 0.0 when either norm is zero or the
/// dimensions disagree.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
