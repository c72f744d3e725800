//! MongoDB Atlas Vector Search dialect.
//!
//! Emits Mongo shell-spelling filter documents over `metadata.<field>`
//! paths: `{"metadata.country":{$eq:"BG"}}`. Operator keys stay bare as
//! the aggregation pipeline accepts them; field keys are quoted.

use crate::ast::Expression;
use crate::dialect::json::{self, JsonDialect};
use crate::dialect::{FilterDialect, RenderedFilter};
use crate::error::FilterResult;
use crate::schema::FilterSchema;

const CONFIG: JsonDialect = JsonDialect {
    name: "mongodb",
    key_prefix: "metadata.",
    quote_operators: false,
    space_after_key: false,
};

/// Filter-document renderer for MongoDB Atlas.
#[derive(Default)]
pub struct MongoDbDialect {
    schema: Option<FilterSchema>,
}

impl MongoDbDialect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce an allow-list of filterable fields.
    pub fn with_allowed_fields(schema: FilterSchema) -> Self {
        Self {
            schema: Some(schema),
        }
    }
}

impl FilterDialect for MongoDbDialect {
    fn name(&self) -> &'static str {
        CONFIG.name
    }

    fn render(&self, expr: &Expression) -> FilterResult<RenderedFilter> {
        json::render(&CONFIG, expr, self.schema.as_ref()).map(RenderedFilter::Text)
    }
}
