//! Azure AI Search (OData) dialect.
//!
//! Emits OData filter fragments over index fields named `meta_<field>`.
//! The index schema is mandatory: Azure rejects filters on fields that
//! were not declared filterable, so the allow-list is enforced here
//! rather than by the service, and the declared field kinds drive date
//! normalization (`Date`-kinded fields emit bare RFC 3339 timestamps).

use crate::ast::Expression;
use crate::dialect::text::{
    self, DateStyle, EscapeStyle, KeyStyle, MembershipStyle, OperatorTokens, StringStyle,
    TextDialect,
};
use crate::dialect::{FilterDialect, RenderedFilter};
use crate::error::FilterResult;
use crate::schema::{FilterSchema, SchemaField};

const CONFIG: TextDialect = TextDialect {
    name: "azure",
    tokens: OperatorTokens {
        and: "and",
        or: "or",
        not: "not",
        eq: "eq",
        ne: "ne",
        lt: "lt",
        lte: "le",
        gt: "gt",
        gte: "ge",
    },
    key_style: KeyStyle::Prefixed {
        prefix: "meta_",
        quote_if_special: Some('\''),
    },
    string_style: StringStyle {
        quote: '\'',
        escape: EscapeStyle::Doubling,
    },
    membership: MembershipStyle::SearchIn,
    date_style: DateStyle::Rfc3339Bare,
    native_negation: true,
};

/// OData filter renderer for Azure AI Search.
pub struct AzureSearchDialect {
    schema: FilterSchema,
}

impl AzureSearchDialect {
    /// Create a renderer over the index's filterable fields.
    pub fn new(fields: impl IntoIterator<Item = SchemaField>) -> Self {
        Self {
            schema: FilterSchema::from_fields(fields),
        }
    }
}

impl FilterDialect for AzureSearchDialect {
    fn name(&self) -> &'static str {
        CONFIG.name
    }

    fn render(&self, expr: &Expression) -> FilterResult<RenderedFilter> {
        text::render(&CONFIG, expr, Some(&self.schema)).map(RenderedFilter::Text)
    }
}
