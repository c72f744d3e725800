//! Vector store abstraction.
//!
//! The trait captures the three operations the filter engine feeds into:
//! adding documents, filtered similarity search, and filtered deletion.
//! Implementations translate the filter expression into their backend's
//! dialect (or evaluate it locally, as the in-memory store does).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sift_filter::Expression;

use crate::document::Document;
use crate::error::StoreResult;

/// Default number of results returned by a similarity search
pub const DEFAULT_TOP_K: usize = 4;

/// A similarity search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query embedding to score against
    pub embedding: Vec<f32>,
    /// Maximum number of results
    pub top_k: usize,
    /// Minimum similarity score; results below are dropped
    pub similarity_threshold: f64,
    /// Optional metadata predicate applied before scoring
    pub filter: Option<Expression>,
}

impl SearchRequest {
    pub fn new(embedding: Vec<f32>) -> Self {
        Self {
            embedding,
            top_k: DEFAULT_TOP_K,
            similarity_threshold: 0.0,
            filter: None,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_filter(mut self, filter: Expression) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// A document together with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

/// Unified vector store abstraction.
///
/// ## Thread Safety
///
/// Implementations must be Send + Sync to enable use across async
/// boundaries.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Add documents, replacing any existing documents with the same id.
    async fn add(&self, documents: Vec<Document>) -> StoreResult<()>;

    /// Return the `top_k` most similar documents, after applying the
    /// request's filter expression and similarity threshold.
    async fn similarity_search(&self, request: SearchRequest) -> StoreResult<Vec<ScoredDocument>>;

    /// Delete every document whose metadata matches the filter; returns
    /// the number of documents removed.
    async fn delete(&self, filter: &Expression) -> StoreResult<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_filter::builder::eq;

    #[test]
    fn test_request_defaults() {
        let request = SearchRequest::new(vec![1.0, 0.0]);
        assert_eq!(request.top_k, DEFAULT_TOP_K);
        assert_eq!(request.similarity_threshold, 0.0);
        assert!(request.filter.is_none());
    }

    #[test]
    fn test_request_builder() {
        let request = SearchRequest::new(vec![1.0])
            .with_top_k(10)
            .with_similarity_threshold(0.5)
            .with_filter(eq("country", "BG"));
        assert_eq!(request.top_k, 10);
        assert_eq!(request.similarity_threshold, 0.5);
        assert!(request.filter.is_some());
    }
}
