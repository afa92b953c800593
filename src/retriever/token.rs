//! Lexical retrieval by token-set Jaccard similarity.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::error::RetrieverResult;
use super::types::RetrievedConcept;
use super::{Retriever, rank_descending};
use crate::dictionary::Concept;

struct TokenIndex {
    concepts: Vec<Concept>,
    token_sets: Vec<HashSet<String>>,
}

/// Deterministic, allocation-only retriever: no external calls.
///
/// Tokens are maximal ASCII alphanumeric runs, optionally joined once by
/// an internal hyphen or apostrophe, case-folded and deduplicated.
#[derive(Default)]
pub struct TokenRetriever {
    index: RwLock<Option<TokenIndex>>,
}

impl std::fmt::Debug for TokenRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRetriever")
            .field("indexed", &self.index.read().is_some())
            .finish()
    }
}

impl TokenRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once `index` has run.
    pub fn is_indexed(&self) -> bool {
        self.index.read().is_some()
    }
}

#[async_trait]
impl Retriever for TokenRetriever {
    fn name(&self) -> &'static str {
        "TokenRetriever"
    }

    fn version(&self) -> &'static str {
        "1.0"
    }

    async fn index(&self, concepts: Vec<Concept>) -> RetrieverResult<()> {
        let mut guard = self.index.write();
        if guard.is_some() {
            warn!("token index already built, ignoring repeated index call");
            return Ok(());
        }

        let token_sets = concepts.iter().map(|c| tokenize(&c.description)).collect();
        debug!(concepts = concepts.len(), "token index built");

        *guard = Some(TokenIndex {
            concepts,
            token_sets,
        });
        Ok(())
    }

    async fn retrieve(&self, query: &str, top_k: usize) -> RetrieverResult<Vec<RetrievedConcept>> {
        let guard = self.index.read();
        let Some(index) = guard.as_ref() else {
            return Ok(vec![]);
        };
        if index.concepts.is_empty() {
            return Ok(vec![]);
        }

        let query_tokens = tokenize(query);

        let mut scored: Vec<(f32, usize)> = Vec::new();
        for (i, concept_tokens) in index.token_sets.iter().enumerate() {
            let score = jaccard(&query_tokens, concept_tokens);
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

/// Splits `text` into lowercase token sets. A token is a maximal
/// `[A-Za-z0-9]` run, optionally extended once through a single internal
/// hyphen or apostrophe ("x-ray", "don't").
pub(crate) fn tokenize(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = HashSet::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_alphanumeric() {
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i].is_ascii_alphanumeric() {
            i += 1;
        }
        let mut token: String = chars[start..i].iter().collect();

        if i + 1 < chars.len()
            && (chars[i] == '-' || chars[i] == '\'')
            && chars[i + 1].is_ascii_alphanumeric()
        {
            token.push(chars[i]);
            i += 1;
            let tail_start = i;
            while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                i += 1;
            }
            token.extend(&chars[tail_start..i]);
        }

        tokens.insert(token.to_ascii_lowercase());
    }

    tokens
}

/// Jaccard similarity of two token sets. Both empty scores 1.0; an empty
/// union with a non-empty side scores 0.0 (divide-by-zero guard).
pub(crate) fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    intersection as f32 / union as f32
}
