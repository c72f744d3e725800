//! Chroma `where` clause dialect.
//!
//! The one structured dialect: renders a [`serde_json::Value`] intended
//! for direct serialization into Chroma's `where` parameter rather than
//! a query string. Shape matches Chroma's Mongo-flavoured operators:
//! `{"country": {"$eq": "BG"}}`, `{"$and": [...]}`. Chroma has no
//! `$not`, so explicit negation is rewritten away before rendering.

use serde_json::{json, Map, Number, Value};

use crate::ast::{Expression, ExpressionType, FilterValue, Operand};
use crate::datetime::format_rfc3339_utc;
use crate::dialect::{FilterDialect, RenderedFilter};
use crate::error::{FilterError, FilterResult};
use crate::schema::FilterSchema;

/// Structured `where` renderer for Chroma.
#[derive(Default)]
pub struct ChromaDialect {
    schema: Option<FilterSchema>,
}

impl ChromaDialect {
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

impl FilterDialect for ChromaDialect {
    fn name(&self) -> &'static str {
        "chroma"
    }

    fn render(&self, expr: &Expression) -> FilterResult<RenderedFilter> {
        let prepared = super::prepared(expr, self.schema.as_ref(), false)?;
        render_expression(&prepared).map(RenderedFilter::Document)
    }
}

fn render_expression(expr: &Expression) -> FilterResult<Value> {
    match expr.op {
        ExpressionType::And | ExpressionType::Or => {
            let op = if expr.op == ExpressionType::And {
                "$and"
            } else {
                "$or"
            };
            let left = render_operand(&expr.left)?;
            let right = match &expr.right {
                Some(right) => render_operand(right)?,
                None => return Err(malformed(expr.op)),
            };
            Ok(json!({ op: [left, right] }))
        }
        ExpressionType::Not => Err(FilterError::UnsupportedOperator(expr.op, "chroma")),
        ExpressionType::In | ExpressionType::Nin => {
            let op = if expr.op == ExpressionType::In {
                "$in"
            } else {
                "$nin"
            };
            let key = expect_key(expr)?;
            let items = match expr.right.as_deref() {
                Some(Operand::Value(FilterValue::List(items))) if !items.is_empty() => items,
                Some(Operand::Value(FilterValue::List(_))) => {
                    return Err(FilterError::EmptyMembershipList)
                }
                _ => return Err(malformed(expr.op)),
            };
            let list = items
                .iter()
                .map(scalar_value)
                .collect::<FilterResult<Vec<_>>>()?;
            Ok(predicate(key, op, Value::Array(list)))
        }
        op => {
            let token = match op {
                ExpressionType::Eq => "$eq",
                ExpressionType::Ne => "$ne",
                ExpressionType::Lt => "$lt",
                ExpressionType::Lte => "$lte",
                ExpressionType::Gt => "$gt",
                ExpressionType::Gte => "$gte",
                _ => return Err(malformed(op)),
            };
            let key = expect_key(expr)?;
            let value = match expr.right.as_deref() {
                Some(Operand::Value(value)) if !value.is_list() => value,
                _ => return Err(malformed(op)),
            };
            Ok(predicate(key, token, scalar_value(value)?))
        }
    }
}

fn render_operand(operand: &Operand) -> FilterResult<Value> {
    match operand {
        Operand::Expression(inner) => render_expression(inner),
        // Document nesting already encodes precedence
        Operand::Group(group) => render_expression(&group.content),
        _ => Err(malformed(ExpressionType::And)),
    }
}

fn predicate(key: String, op: &str, value: Value) -> Value {
    let mut inner = Map::new();
    inner.insert(op.to_string(), value);
    let mut outer = Map::new();
    outer.insert(key, Value::Object(inner));
    Value::Object(outer)
}

fn expect_key(expr: &Expression) -> FilterResult<String> {
    match expr.left.as_ref() {
        Operand::Key(key) => Ok(key.unquoted().to_string()),
        _ => Err(malformed(expr.op)),
    }
}

fn scalar_value(value: &FilterValue) -> FilterResult<Value> {
    match value {
        FilterValue::Text(text) => Ok(Value::String(text.clone())),
        FilterValue::Int(value) => Ok(Value::Number((*value).into())),
        FilterValue::Decimal(value) => Number::from_f64(*value)
            .map(Value::Number)
            .ok_or(FilterError::NonFiniteDecimal),
        FilterValue::Bool(value) => Ok(Value::Bool(*value)),
        FilterValue::Date(date) => Ok(Value::String(format_rfc3339_utc(date))),
        FilterValue::List(_) => Err(malformed(ExpressionType::Eq)),
    }
}

fn malformed(op: ExpressionType) -> FilterError {
    FilterError::MalformedOperand {
        op,
        message: "operand shape does not fit the operator".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{eq, group, gte, in_list, ne, nin_list};

    fn render(expr: &Expression) -> Value {
        ChromaDialect::new()
            .render(expr)
            .unwrap()
            .as_document()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_eq() {
        assert_eq!(render(&eq("country", "BG")), json!({"country": {"$eq": "BG"}}));
    }

    #[test]
    fn test_and() {
        let expr = eq("genre", "drama").and(gte("year", 2020));
        assert_eq!(
            render(&expr),
            json!({"$and": [{"genre": {"$eq": "drama"}}, {"year": {"$gte": 2020}}]})
        );
    }

    #[test]
    fn test_in() {
        let expr = in_list("genre", ["comedy", "documentary", "drama"]);
        assert_eq!(
            render(&expr),
            json!({"genre": {"$in": ["comedy", "documentary", "drama"]}})
        );
    }

    #[test]
    fn test_group_renders_content() {
        let expr = group(gte("year", 2020).or(eq("country", "BG")))
            .and(nin_list("city", ["Sofia", "Plovdiv"]));
        assert_eq!(
            render(&expr),
            json!({"$and": [
                {"$or": [{"year": {"$gte": 2020}}, {"country": {"$eq": "BG"}}]},
                {"city": {"$nin": ["Sofia", "Plovdiv"]}}
            ]})
        );
    }

    #[test]
    fn test_not_rewritten() {
        let expr = eq("city", "Sofia").negate();
        assert_eq!(render(&expr), json!({"city": {"$ne": "Sofia"}}));
    }

    #[test]
    fn test_de_morgan_rewrite() {
        let expr = eq("a", 1).and(ne("b", 2)).negate();
        assert_eq!(
            render(&expr),
            json!({"$or": [{"a": {"$ne": 1}}, {"b": {"$eq": 2}}]})
        );
    }

    #[test]
    fn test_document_output_kind() {
        let rendered = ChromaDialect::new().render(&eq("a", 1)).unwrap();
        assert!(rendered.as_text().is_none());
        assert!(rendered.as_document().is_some());
    }
}
