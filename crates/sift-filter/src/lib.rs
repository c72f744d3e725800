//! Portable metadata filter expressions for vector stores
//!
//! This crate provides a store-agnostic filter expression AST together
//! with everything needed to get predicates in and out of it:
//!
//! - **AST + builder**: a closed set of node types (`Key`, `Value`,
//!   `Expression`, `Group`) with fluent construction helpers
//! - **Text parser**: a SQL-WHERE-flavoured filter language parsed with
//!   chumsky, with per-string expression caching
//! - **Dialects**: renderers for ten vector-store query syntaxes behind
//!   one `FilterDialect` trait, driven by shared engines where the
//!   target is infix or Mongo-shaped
//! - **Transforms**: allow-list/structural validation and negation
//!   push-down for targets without a native `NOT`
//! - **Evaluation**: direct predicate evaluation against a metadata map
//!   for in-memory stores
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sift_filter::builder::{eq, gte};
//! use sift_filter::dialect::{AzureSearchDialect, FilterDialect};
//! use sift_filter::schema::SchemaField;
//!
//! let dialect = AzureSearchDialect::new([
//!     SchemaField::text("genre"),
//!     SchemaField::int64("year"),
//! ]);
//! let expr = eq("genre", "drama").and(gte("year", 2020));
//! let odata = dialect.render(&expr)?;
//! // => meta_genre eq 'drama' and meta_year ge 2020
//! ```

pub mod ast;
pub mod builder;
pub mod datetime;
pub mod dialect;
pub mod error;
pub mod eval;
pub mod parse;
pub mod schema;
pub mod transform;

// Re-exports
pub use ast::{Expression, ExpressionType, FilterValue, Group, Key, Operand};
pub use dialect::{DialectRegistry, FilterDialect, RenderedFilter};
pub use error::{FilterError, FilterResult};
pub use parse::FilterParser;
pub use schema::{FieldKind, FilterSchema, SchemaField};
