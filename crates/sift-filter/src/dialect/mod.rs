//! Target dialect renderers.
//!
//! Dialects convert a filter [`Expression`] into the query-fragment
//! syntax of one target system. Infix text syntaxes (Azure AI Search,
//! Milvus, Neo4j, pgvector) share one generic engine parameterized by a
//! [`TextDialect`](text::TextDialect) configuration; Mongo-style operator
//! documents (Pinecone, MongoDB Atlas) share a second engine. Surfaces
//! too positional for a token table (Lucene query strings, RediSearch,
//! Weaviate operand blocks, Chroma's structured `where` value) implement
//! [`FilterDialect`] directly on the same traversal shape.
//!
//! Rendering is pure: the same tree and configuration always produce
//! byte-identical output. The only validation performed is the
//! identifier allow-list plus structural checks; dialects without a
//! native negation token run negation push-down first.

mod azure;
mod chroma;
mod elastic;
mod json;
mod milvus;
mod mongodb;
mod neo4j;
mod pgvector;
mod pinecone;
mod redis;
mod text;
mod weaviate;

pub use azure::AzureSearchDialect;
pub use chroma::ChromaDialect;
pub use elastic::ElasticsearchDialect;
pub use json::JsonDialect;
pub use milvus::MilvusDialect;
pub use mongodb::MongoDbDialect;
pub use neo4j::Neo4jDialect;
pub use pgvector::PgVectorDialect;
pub use pinecone::PineconeDialect;
pub use redis::RedisDialect;
pub use text::{
    DateStyle, EscapeStyle, KeyStyle, MembershipStyle, OperatorTokens, StringStyle, TextDialect,
};
pub use weaviate::WeaviateDialect;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::ast::Expression;
use crate::error::{FilterError, FilterResult};
use crate::schema::FilterSchema;
use crate::transform::{check, push_down_negation};

/// Output of a dialect render: a query-fragment string, or a structured
/// value intended for direct JSON serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedFilter {
    Text(String),
    Document(Value),
}

impl RenderedFilter {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Document(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Document(_) => None,
        }
    }

    pub fn as_document(&self) -> Option<&Value> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for RenderedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Document(doc) => write!(f, "{}", doc),
        }
    }
}

/// Trait for dialect renderers.
///
/// Implementations are immutable configuration plus pure functions; a
/// single instance may be shared and reused concurrently.
pub trait FilterDialect: Send + Sync {
    /// Unique name for this dialect
    fn name(&self) -> &'static str;

    /// Render the expression into the target query language.
    fn render(&self, expr: &Expression) -> FilterResult<RenderedFilter>;
}

/// Validate, then rewrite negation away when the target has no native
/// negation token. Borrows the input when no rewrite is needed.
pub(crate) fn prepared<'a>(
    expr: &'a Expression,
    schema: Option<&FilterSchema>,
    native_negation: bool,
) -> FilterResult<Cow<'a, Expression>> {
    check(expr, schema)?;
    if native_negation {
        Ok(Cow::Borrowed(expr))
    } else {
        Ok(Cow::Owned(push_down_negation(expr.clone())))
    }
}

/// Escape `\` and the given quote character with backslashes.
pub(crate) fn escape_backslash(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape a quote character by doubling it (SQL/OData convention).
pub(crate) fn escape_doubling(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == quote {
            out.push(quote);
        }
        out.push(c);
    }
    out
}

/// Convert a finite decimal to its target spelling.
pub(crate) fn format_decimal(value: f64) -> FilterResult<String> {
    if value.is_finite() {
        Ok(value.to_string())
    } else {
        Err(FilterError::NonFiniteDecimal)
    }
}

/// Registry of dialect renderers, addressable by name.
pub struct DialectRegistry {
    dialects: Vec<Arc<dyn FilterDialect>>,
}

impl DialectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            dialects: Vec::new(),
        }
    }

    /// Every dialect that needs no schema to construct. Azure AI Search
    /// requires a field schema and is registered by the caller.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(MilvusDialect::new()));
        registry.register(Arc::new(Neo4jDialect::new()));
        registry.register(Arc::new(PgVectorDialect::new()));
        registry.register(Arc::new(PineconeDialect::new()));
        registry.register(Arc::new(MongoDbDialect::new()));
        registry.register(Arc::new(ElasticsearchDialect::new()));
        registry.register(Arc::new(RedisDialect::new()));
        registry.register(Arc::new(WeaviateDialect::new()));
        registry.register(Arc::new(ChromaDialect::new()));
        registry
    }

    /// Register a dialect (later registrations shadow earlier names)
    pub fn register(&mut self, dialect: Arc<dyn FilterDialect>) {
        self.dialects.retain(|d| d.name() != dialect.name());
        self.dialects.push(dialect);
    }

    /// Look up a dialect by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn FilterDialect>> {
        self.dialects.iter().find(|d| d.name() == name).cloned()
    }

    /// Names of all registered dialects
    pub fn names(&self) -> Vec<&'static str> {
        self.dialects.iter().map(|d| d.name()).collect()
    }

    /// Render through the named dialect.
    pub fn render(&self, name: &str, expr: &Expression) -> FilterResult<RenderedFilter> {
        match self.get(name) {
            Some(dialect) => dialect.render(expr),
            None => Err(FilterError::UnknownDialect(name.to_string())),
        }
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::eq;

    #[test]
    fn test_default_registry_names() {
        let registry = DialectRegistry::with_defaults();
        let names = registry.names();
        for name in [
            "milvus",
            "neo4j",
            "pgvector",
            "pinecone",
            "mongodb",
            "elastic",
            "redis",
            "weaviate",
            "chroma",
        ] {
            assert!(names.contains(&name), "missing dialect {}", name);
        }
    }

    #[test]
    fn test_registry_unknown_dialect() {
        let registry = DialectRegistry::with_defaults();
        assert!(registry.render("oracle", &eq("a", 1)).is_err());
    }

    #[test]
    fn test_register_shadows_same_name() {
        let mut registry = DialectRegistry::new();
        registry.register(Arc::new(MilvusDialect::new()));
        registry.register(Arc::new(MilvusDialect::new()));
        assert_eq!(registry.names(), vec!["milvus"]);
    }

    #[test]
    fn test_escape_backslash() {
        assert_eq!(escape_backslash(r#"a"b\c"#, '"'), r#"a\"b\\c"#);
    }

    #[test]
    fn test_escape_doubling() {
        assert_eq!(escape_doubling("John's", '\''), "John''s");
    }
}
