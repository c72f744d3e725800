//! Vector store abstraction with filter-expression support
//!
//! This crate provides the storage seam the filter engine plugs into:
//!
//! - **VectorStore**: async trait over add / filtered similarity search /
//!   filtered delete
//! - **Document**: content + embedding + filterable metadata
//! - **SimpleVectorStore**: in-memory cosine-similarity implementation
//!   that evaluates filter expressions locally
//!
//! Backend adapters that talk to a real vector database render the
//! request's filter through the matching `sift_filter` dialect instead
//! of evaluating it in process.

pub mod document;
pub mod error;
pub mod simple;
pub mod store;

// Re-exports
pub use document::Document;
pub use error::{StoreError, StoreResult};
pub use simple::SimpleVectorStore;
pub use store::{ScoredDocument, SearchRequest, VectorStore, DEFAULT_TOP_K};
