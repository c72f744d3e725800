//! String escaping tests: values containing quotes, backslashes, and
//! separator characters must never alter the generated syntax.

use sift_filter::builder::eq;
use sift_filter::dialect::{
    DialectRegistry, FilterDialect, MilvusDialect, PgVectorDialect, PineconeDialect,
};

fn text(dialect: &dyn FilterDialect, expr: &sift_filter::Expression) -> String {
    dialect.render(expr).unwrap().into_text().unwrap()
}

#[test]
fn test_pinecone_double_quotes_escaped() {
    let rendered = text(&PineconeDialect::new(), &eq("author", "John \"The Boss\" Doe"));
    assert!(rendered.contains("\\\""));
    assert!(rendered.contains("John"));
    assert!(rendered.contains("The Boss"));
    // The escaped output must still be valid JSON
    assert!(serde_json::from_str::<serde_json::Value>(&rendered).is_ok());
}

#[test]
fn test_pinecone_backslashes_escaped() {
    let rendered = text(&PineconeDialect::new(), &eq("path", "C:\\Users\\admin"));
    assert!(rendered.contains("\\\\"));
    assert!(serde_json::from_str::<serde_json::Value>(&rendered).is_ok());
}

#[test]
fn test_pinecone_single_quotes_left_alone() {
    // JSON delimits strings with double quotes; single quotes are ordinary
    let rendered = text(&PineconeDialect::new(), &eq("title", "John's Book"));
    assert!(rendered.contains("John's Book"));
    assert!(!rendered.contains("\\'"));
}

#[test]
fn test_milvus_quote_injection_blocked() {
    let rendered = text(
        &MilvusDialect::new(),
        &eq("name", "x\" || metadata[\"admin\"] == \"true"),
    );
    // Every interior double quote must arrive escaped
    let payload = rendered
        .strip_prefix("metadata[\"name\"] == \"")
        .and_then(|s| s.strip_suffix('"'))
        .expect("unexpected shape");
    let mut chars = payload.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else {
            assert_ne!(c, '"', "unescaped quote in {}", rendered);
        }
    }
}

#[test]
fn test_pgvector_quote_doubling() {
    let rendered = text(&PgVectorDialect::new(), &eq("name", "O'Brien"));
    assert_eq!(rendered, "metadata->>'name' = 'O''Brien'");
}

#[test]
fn test_sql_injection_attempt_is_inert() {
    let rendered = text(
        &PgVectorDialect::new(),
        &eq("name", "x'; DROP TABLE documents; --"),
    );
    assert_eq!(
        rendered,
        "metadata->>'name' = 'x''; DROP TABLE documents; --'"
    );
}

#[test]
fn test_unicode_values_pass_through() {
    let rendered = text(&PineconeDialect::new(), &eq("city", "София"));
    assert_eq!(rendered, "{\"city\": {\"$eq\": \"София\"}}");
}

#[test]
fn test_special_characters_preserved_across_dialects() {
    let registry = DialectRegistry::with_defaults();
    let expr = eq("description", "Item with spaces & symbols!");
    for name in ["milvus", "neo4j", "pgvector", "pinecone", "mongodb", "elastic"] {
        let rendered = registry.render(name, &expr).unwrap().into_text().unwrap();
        assert!(
            rendered.contains("Item with spaces & symbols!"),
            "{} mangled the value: {}",
            name,
            rendered
        );
    }
}
