//! Milvus boolean expression dialect.
//!
//! Emits Milvus scalar filtering expressions over the JSON `metadata`
//! field: `metadata["country"] == "BG"`, `&&`/`||` connectives, native
//! `in`/`not in` lists.

use crate::ast::Expression;
use crate::dialect::text::{
    self, DateStyle, EscapeStyle, KeyStyle, MembershipStyle, OperatorTokens, StringStyle,
    TextDialect,
};
use crate::dialect::{FilterDialect, RenderedFilter};
use crate::error::FilterResult;
use crate::schema::FilterSchema;

const CONFIG: TextDialect = TextDialect {
    name: "milvus",
    tokens: OperatorTokens {
        and: "&&",
        or: "||",
        not: "not",
        eq: "==",
        ne: "!=",
        lt: "<",
        lte: "<=",
        gt: ">",
        gte: ">=",
    },
    key_style: KeyStyle::Bracketed { target: "metadata" },
    string_style: StringStyle {
        quote: '"',
        escape: EscapeStyle::Backslash,
    },
    membership: MembershipStyle::Delimited {
        open: "[",
        close: "]",
        sep: ",",
        in_token: "in",
        nin_token: Some("not in"),
    },
    date_style: DateStyle::QuotedText,
    native_negation: true,
};

/// Milvus scalar filter renderer.
#[derive(Default)]
pub struct MilvusDialect {
    schema: Option<FilterSchema>,
}

impl MilvusDialect {
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

impl FilterDialect for MilvusDialect {
    fn name(&self) -> &'static str {
        CONFIG.name
    }

    fn render(&self, expr: &Expression) -> FilterResult<RenderedFilter> {
        text::render(&CONFIG, expr, self.schema.as_ref()).map(RenderedFilter::Text)
    }
}
