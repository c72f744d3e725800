//! In-memory vector store.
//!
//! Cosine-similarity search over a document map guarded by a
//! reader-writer lock. Filter expressions are evaluated locally against
//! each document's metadata before scoring, so the store accepts any
//! expression the evaluator supports without translating it into a
//! backend dialect. Intended for tests, examples, and small corpora that
//! fit in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use sift_filter::{eval, Expression};
use tracing::debug;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::store::{ScoredDocument, SearchRequest, VectorStore};

/// In-memory store with cosine-similarity scoring.
#[derive(Default)]
pub struct SimpleVectorStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl SimpleVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl VectorStore for SimpleVectorStore {
    async fn add(&self, documents: Vec<Document>) -> StoreResult<()> {
        let mut map = self.documents.write();
        for document in documents {
            map.insert(document.id.clone(), document);
        }
        Ok(())
    }

    async fn similarity_search(&self, request: SearchRequest) -> StoreResult<Vec<ScoredDocument>> {
        let map = self.documents.read();
        let mut scored = Vec::new();

        for document in map.values() {
            if let Some(filter) = &request.filter {
                if !eval::matches(filter, &document.metadata)? {
                    continue;
                }
            }
            let score = cosine_similarity(&request.embedding, &document.embedding)?;
            if score >= request.similarity_threshold {
                scored.push(ScoredDocument {
                    document: document.clone(),
                    score,
                });
            }
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(request.top_k);

        debug!(
            results = scored.len(),
            filtered = request.filter.is_some(),
            "similarity search complete"
        );
        Ok(scored)
    }

    async fn delete(&self, filter: &Expression) -> StoreResult<usize> {
        let mut map = self.documents.write();
        let doomed: Vec<String> = map
            .values()
            .filter_map(|document| match eval::matches(filter, &document.metadata) {
                Ok(true) => Some(Ok(document.id.clone())),
                Ok(false) => None,
                Err(err) => Some(Err(err)),
            })
            .collect::<Result<_, _>>()?;

        for id in &doomed {
            map.remove(id);
        }

        debug!(removed = doomed.len(), "filtered delete complete");
        Ok(doomed.len())
    }
}

/// Cosine similarity between two equal-length vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> StoreResult<f64> {
    if a.len() != b.len() {
        return Err(StoreError::InvalidRequest(format!(
            "embedding dimensions differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(StoreError::InvalidRequest(
            "embeddings must not have zero norm".to_string(),
        ));
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
