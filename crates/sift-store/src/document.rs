//! Documents stored alongside their embeddings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A piece of content with its embedding and filterable metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub metadata: HashMap<String, Value>,
    pub embedding: Vec<f32>,
}

impl Document {
    /// Create a document with a random id.
    pub fn new(content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), content, embedding)
    }

    /// Create a document with a caller-chosen id.
    pub fn with_id(id: impl Into<String>, content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
            embedding,
        }
    }

    /// Attach one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = Document::new("one", vec![1.0]);
        let b = Document::new("two", vec![1.0]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_metadata_builder() {
        let doc = Document::new("text", vec![0.0])
            .with_metadata("country", "BG")
            .with_metadata("year", 2020);
        assert_eq!(doc.metadata.get("country"), Some(&json!("BG")));
        assert_eq!(doc.metadata.get("year"), Some(&json!(2020)));
    }
}
