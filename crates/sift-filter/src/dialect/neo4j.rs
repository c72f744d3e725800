//! Neo4j Cypher dialect.
//!
//! Emits Cypher predicate fragments over node properties named
//! `` node.`metadata.<field>` `` — the backticks keep identifiers with
//! spaces or dots addressable. `NIN` has no direct Cypher spelling and
//! renders as `NOT <key> IN [...]`.

use crate::ast::Expression;
use crate::dialect::text::{
    self, DateStyle, EscapeStyle, KeyStyle, MembershipStyle, OperatorTokens, StringStyle,
    TextDialect,
};
use crate::dialect::{FilterDialect, RenderedFilter};
use crate::error::FilterResult;
use crate::schema::FilterSchema;

const CONFIG: TextDialect = TextDialect {
    name: "neo4j",
    tokens: OperatorTokens {
        and: "AND",
        or: "OR",
        not: "NOT",
        eq: "=",
        ne: "<>",
        lt: "<",
        lte: "<=",
        gt: ">",
        gte: ">=",
    },
    key_style: KeyStyle::Backticked {
        object: "node",
        prefix: "metadata.",
    },
    string_style: StringStyle {
        quote: '"',
        escape: EscapeStyle::Backslash,
    },
    membership: MembershipStyle::Delimited {
        open: "[",
        close: "]",
        sep: ",",
        in_token: "IN",
        nin_token: None,
    },
    date_style: DateStyle::QuotedText,
    native_negation: true,
};

/// Cypher predicate renderer for Neo4j vector indexes.
#[derive(Default)]
pub struct Neo4jDialect {
    schema: Option<FilterSchema>,
}

impl Neo4jDialect {
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

impl FilterDialect for Neo4jDialect {
    fn name(&self) -> &'static str {
        CONFIG.name
    }

    fn render(&self, expr: &Expression) -> FilterResult<RenderedFilter> {
        text::render(&CONFIG, expr, self.schema.as_ref()).map(RenderedFilter::Text)
    }
}
