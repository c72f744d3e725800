//! Command implementations.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use sift_filter::dialect::{
    AzureSearchDialect, ChromaDialect, DialectRegistry, ElasticsearchDialect, FilterDialect,
    MilvusDialect, MongoDbDialect, Neo4jDialect, PgVectorDialect, PineconeDialect, RedisDialect,
    WeaviateDialect,
};
use sift_filter::{eval, parse, FieldKind, FilterSchema, SchemaField};
use tracing::debug;

pub fn run_parse(expression: &str) -> Result<()> {
    let expr = parse::parse(expression)?;
    println!("{}", serde_json::to_string_pretty(&expr)?);
    Ok(())
}

pub fn run_render(expression: &str, dialect: &str, fields: &[String]) -> Result<()> {
    let expr = parse::parse(expression)?;

    let schema = if fields.is_empty() {
        None
    } else {
        Some(parse_schema(fields)?)
    };
    debug!(dialect, fields = fields.len(), "rendering filter");

    let mut registry = DialectRegistry::with_defaults();
    if let Some(schema) = schema {
        registry.register(dialect_with_schema(dialect, schema)?);
    } else if dialect == "azure" {
        bail!("the azure dialect requires at least one --field NAME:KIND");
    }

    let rendered = registry.render(dialect, &expr)?;
    println!("{}", rendered);
    Ok(())
}

pub fn run_eval(expression: &str, metadata: &str) -> Result<()> {
    let expr = parse::parse(expression)?;
    let metadata: HashMap<String, serde_json::Value> =
        serde_json::from_str(metadata).context("metadata must be a JSON object")?;
    println!("{}", eval::matches(&expr, &metadata)?);
    Ok(())
}

pub fn run_dialects() -> Result<()> {
    let registry = DialectRegistry::with_defaults();
    for name in registry.names() {
        println!("{}", name);
    }
    // Schema-requiring dialect, not constructible without fields
    println!("azure (requires --field)");
    Ok(())
}

/// Parse repeated `NAME:KIND` arguments into a schema.
fn parse_schema(fields: &[String]) -> Result<FilterSchema> {
    let mut schema_fields = Vec::new();
    for field in fields {
        let (name, kind) = field
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("field '{}' is not NAME:KIND", field))?;
        let kind = match kind {
            "text" => FieldKind::Text,
            "int" => FieldKind::Int64,
            "decimal" => FieldKind::Decimal,
            "bool" => FieldKind::Bool,
            "date" => FieldKind::Date,
            other => bail!("unknown field kind '{}' in '{}'", other, field),
        };
        schema_fields.push(SchemaField::new(name, kind));
    }
    Ok(FilterSchema::from_fields(schema_fields))
}

fn dialect_with_schema(name: &str, schema: FilterSchema) -> Result<Arc<dyn FilterDialect>> {
    let dialect: Arc<dyn FilterDialect> = match name {
        "azure" => Arc::new(AzureSearchDialect::new(
            schema_into_fields(schema),
        )),
        "milvus" => Arc::new(MilvusDialect::with_allowed_fields(schema)),
        "neo4j" => Arc::new(Neo4jDialect::with_allowed_fields(schema)),
        "pgvector" => Arc::new(PgVectorDialect::with_allowed_fields(schema)),
        "pinecone" => Arc::new(PineconeDialect::with_allowed_fields(schema)),
        "mongodb" => Arc::new(MongoDbDialect::with_allowed_fields(schema)),
        "elastic" => Arc::new(ElasticsearchDialect::with_allowed_fields(schema)),
        "redis" => Arc::new(RedisDialect::with_allowed_fields(schema)),
        "weaviate" => Arc::new(WeaviateDialect::with_allowed_fields(schema)),
        "chroma" => Arc::new(ChromaDialect::with_allowed_fields(schema)),
        other => bail!("unknown dialect: {}", other),
    };
    Ok(dialect)
}

fn schema_into_fields(schema: FilterSchema) -> Vec<SchemaField> {
    // AzureSearchDialect takes the field list directly
    schema.fields().to_vec()
}
