//! Pinecone metadata filter dialect.
//!
//! Emits Pinecone's Mongo-flavoured JSON filter objects:
//! `{"country": {"$eq": "BG"}}`, combined with `{"$and": [...]}` /
//! `{"$or": [...]}`. Pinecone has no `$not`, so explicit negation is
//! rewritten away before rendering.

use crate::ast::Expression;
use crate::dialect::json::{self, JsonDialect};
use crate::dialect::{FilterDialect, RenderedFilter};
use crate::error::FilterResult;
use crate::schema::FilterSchema;

const CONFIG: JsonDialect = JsonDialect {
    name: "pinecone",
    key_prefix: "",
    quote_operators: true,
    space_after_key: true,
};

/// JSON filter renderer for Pinecone.
#[derive(Default)]
pub struct PineconeDialect {
    schema: Option<FilterSchema>,
}

impl PineconeDialect {
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

impl FilterDialect for PineconeDialect {
    fn name(&self) -> &'static str {
        CONFIG.name
    }

    fn render(&self, expr: &Expression) -> FilterResult<RenderedFilter> {
        json::render(&CONFIG, expr, self.schema.as_ref()).map(RenderedFilter::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExpressionType, FilterValue, Key};
    use crate::builder::{eq, group, gt, gte, in_list, lte, ne, nin_list};

    fn render(expr: &Expression) -> String {
        PineconeDialect::new().render(expr).unwrap().into_text().unwrap()
    }

    #[test]
    fn test_eq() {
        assert_eq!(render(&eq("country", "BG")), "{\"country\": {\"$eq\": \"BG\"}}");
    }

    #[test]
    fn test_eq_and_gte() {
        let expr = eq("genre", "drama").and(gte("year", 2020));
        assert_eq!(
            render(&expr),
            "{\"$and\": [{\"genre\": {\"$eq\": \"drama\"}},{\"year\": {\"$gte\": 2020}}]}"
        );
    }

    #[test]
    fn test_in() {
        let expr = in_list("genre", ["comedy", "documentary", "drama"]);
        assert_eq!(
            render(&expr),
            "{\"genre\": {\"$in\": [\"comedy\",\"documentary\",\"drama\"]}}"
        );
    }

    #[test]
    fn test_or_of_and() {
        let expr = gte("year", 2020).or(eq("country", "BG").and(ne("city", "Sofia")));
        assert_eq!(
            render(&expr),
            "{\"$or\": [{\"year\": {\"$gte\": 2020}},{\"$and\": [{\"country\": {\"$eq\": \"BG\"}},{\"city\": {\"$ne\": \"Sofia\"}}]}]}"
        );
    }

    #[test]
    fn test_group_renders_content() {
        let expr = group(gte("year", 2020).or(eq("country", "BG")))
            .and(nin_list("city", ["Sofia", "Plovdiv"]));
        assert_eq!(
            render(&expr),
            "{\"$and\": [{\"$or\": [{\"year\": {\"$gte\": 2020}},{\"country\": {\"$eq\": \"BG\"}}]},{\"city\": {\"$nin\": [\"Sofia\",\"Plovdiv\"]}}]}"
        );
    }

    #[test]
    fn test_boolean_value() {
        let expr = eq("isOpen", true)
            .and(gte("year", 2020))
            .and(in_list("country", ["BG", "NL", "US"]));
        assert_eq!(
            render(&expr),
            "{\"$and\": [{\"$and\": [{\"isOpen\": {\"$eq\": true}},{\"year\": {\"$gte\": 2020}}]},{\"country\": {\"$in\": [\"BG\",\"NL\",\"US\"]}}]}"
        );
    }

    #[test]
    fn test_decimal_bounds() {
        let expr = gte("temperature", -15.6).and(lte("temperature", 20.13));
        assert_eq!(
            render(&expr),
            "{\"$and\": [{\"temperature\": {\"$gte\": -15.6}},{\"temperature\": {\"$lte\": 20.13}}]}"
        );
    }

    #[test]
    fn test_complex_identifier_unquoted() {
        let expr = Expression::new(
            ExpressionType::Eq,
            Key::new("\"country 1 2 3\""),
            FilterValue::Text("BG".to_string()),
        );
        assert_eq!(render(&expr), "{\"country 1 2 3\": {\"$eq\": \"BG\"}}");
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(render(&gt("score", 85)), "{\"score\": {\"$gt\": 85}}");
        assert_eq!(
            render(&nin_list("status", [100, 200, 404])),
            "{\"status\": {\"$nin\": [100,200,404]}}"
        );
    }

    #[test]
    fn test_double_quote_escaping() {
        let expr = eq("author", "John \"The Boss\" Doe");
        assert_eq!(
            render(&expr),
            "{\"author\": {\"$eq\": \"John \\\"The Boss\\\" Doe\"}}"
        );
    }

    #[test]
    fn test_backslash_escaping() {
        let expr = eq("path", "C:\\Users\\admin");
        assert_eq!(
            render(&expr),
            "{\"path\": {\"$eq\": \"C:\\\\Users\\\\admin\"}}"
        );
    }

    #[test]
    fn test_single_quote_preserved() {
        let expr = eq("title", "John's Book");
        assert_eq!(render(&expr), "{\"title\": {\"$eq\": \"John's Book\"}}");
    }

    #[test]
    fn test_not_rewritten_to_ne() {
        let expr = eq("country", "BG").negate();
        assert_eq!(render(&expr), "{\"country\": {\"$ne\": \"BG\"}}");
    }

    #[test]
    fn test_not_over_and_rewritten() {
        // not (a == 1 && b == 2) => a != 1 || b != 2
        let expr = eq("a", 1).and(eq("b", 2)).negate();
        assert_eq!(
            render(&expr),
            "{\"$or\": [{\"a\": {\"$ne\": 1}},{\"b\": {\"$ne\": 2}}]}"
        );
    }

    #[test]
    fn test_output_is_valid_json() {
        let expr = group(gte("year", 2020).or(eq("country", "BG")))
            .and(nin_list("city", ["Sofia", "Plovdiv"]));
        let text = render(&expr);
        assert!(serde_json::from_str::<serde_json::Value>(&text).is_ok());
    }
}
