//! PostgreSQL/pgvector dialect.
//!
//! Emits SQL predicate fragments over a `metadata` jsonb column using the
//! `->>` text extraction operator. String literals follow SQL quoting
//! with doubled single quotes; membership uses native `IN (...)` lists.

use crate::ast::Expression;
use crate::dialect::text::{
    self, DateStyle, EscapeStyle, KeyStyle, MembershipStyle, OperatorTokens, StringStyle,
    TextDialect,
};
use crate::dialect::{FilterDialect, RenderedFilter};
use crate::error::FilterResult;
use crate::schema::FilterSchema;

const CONFIG: TextDialect = TextDialect {
    name: "pgvector",
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
    key_style: KeyStyle::JsonArrow { column: "metadata" },
    string_style: StringStyle {
        quote: '\'',
        escape: EscapeStyle::Doubling,
    },
    membership: MembershipStyle::Delimited {
        open: "(",
        close: ")",
        sep: ",",
        in_token: "IN",
        nin_token: Some("NOT IN"),
    },
    date_style: DateStyle::QuotedText,
    native_negation: true,
};

/// SQL predicate renderer for pgvector tables.
#[derive(Default)]
pub struct PgVectorDialect {
    schema: Option<FilterSchema>,
}

impl PgVectorDialect {
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

impl FilterDialect for PgVectorDialect {
    fn name(&self) -> &'static str {
        CONFIG.name
    }

    fn render(&self, expr: &Expression) -> FilterResult<RenderedFilter> {
        text::render(&CONFIG, expr, self.schema.as_ref()).map(RenderedFilter::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{eq, group, gte, in_list, ne, nin_list};

    fn render(expr: &Expression) -> String {
        PgVectorDialect::new().render(expr).unwrap().into_text().unwrap()
    }

    #[test]
    fn test_eq() {
        assert_eq!(render(&eq("country", "BG")), "metadata->>'country' = 'BG'");
    }

    #[test]
    fn test_eq_and_gte() {
        let expr = eq("genre", "drama").and(gte("year", 2020));
        assert_eq!(
            render(&expr),
            "metadata->>'genre' = 'drama' AND metadata->>'year' >= 2020"
        );
    }

    #[test]
    fn test_in() {
        let expr = in_list("genre", ["comedy", "documentary", "drama"]);
        assert_eq!(
            render(&expr),
            "metadata->>'genre' IN ('comedy','documentary','drama')"
        );
    }

    #[test]
    fn test_nin() {
        let expr = nin_list("city", ["Sofia", "Plovdiv"]);
        assert_eq!(render(&expr), "metadata->>'city' NOT IN ('Sofia','Plovdiv')");
    }

    #[test]
    fn test_group() {
        let expr = group(gte("year", 2020).or(eq("country", "BG"))).and(ne("city", "Sofia"));
        assert_eq!(
            render(&expr),
            "(metadata->>'year' >= 2020 OR metadata->>'country' = 'BG') AND metadata->>'city' <> 'Sofia'"
        );
    }

    #[test]
    fn test_sql_quote_doubling_blocks_injection() {
        let expr = eq("name", "x' OR '1'='1");
        assert_eq!(
            render(&expr),
            "metadata->>'name' = 'x'' OR ''1''=''1'"
        );
    }

    #[test]
    fn test_explicit_not() {
        let expr = group(eq("country", "BG")).negate();
        assert_eq!(render(&expr), "NOT (metadata->>'country' = 'BG')");
    }
}
