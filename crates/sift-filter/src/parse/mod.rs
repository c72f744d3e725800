//! Textual filter language parser.
//!
//! Parses the portable, store-agnostic filter syntax into an
//! [`Expression`] tree:
//!
//! ```rust
//! use sift_filter::parse::FilterParser;
//!
//! let parser = FilterParser::new();
//! let expr = parser.parse("genre == 'drama' && year >= 2020").unwrap();
//! ```
//!
//! Parsed expressions are cached per input string; repeated filters in a
//! hot search path hit the cache instead of re-running the grammar.

mod grammar;

pub use grammar::format_errors;

use std::collections::HashMap;

use chumsky::Parser as _;
use parking_lot::RwLock;
use tracing::trace;

use crate::ast::Expression;
use crate::error::{FilterError, FilterResult};

/// Parser for the portable filter expression language.
///
/// Stateless aside from the expression cache; a single instance may be
/// shared across threads.
#[derive(Default)]
pub struct FilterParser {
    cache: RwLock<HashMap<String, Expression>>,
}

impl FilterParser {
    /// Create a parser with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a filter expression, consulting the cache first.
    pub fn parse(&self, input: &str) -> FilterResult<Expression> {
        if let Some(expr) = self.cache.read().get(input) {
            trace!(input, "filter expression cache hit");
            return Ok(expr.clone());
        }

        let expr = parse(input)?;
        self.cache
            .write()
            .insert(input.to_string(), expr.clone());
        Ok(expr)
    }

    /// Drop all cached expressions.
    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// Number of cached expressions.
    pub fn cache_len(&self) -> usize {
        self.cache.read().len()
    }
}

/// One-shot parse without caching.
pub fn parse(input: &str) -> FilterResult<Expression> {
    grammar::filter_expression()
        .parse(input)
        .into_result()
        .map_err(|errs| FilterError::Parse {
            errors: format_errors(&errs, input),
        })
}
