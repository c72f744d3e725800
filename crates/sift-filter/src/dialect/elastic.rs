//! Elasticsearch query-string dialect.
//!
//! Emits Lucene query-string fragments over `metadata.<field>` paths:
//! `metadata.country:"BG"`, range comparisons as `metadata.year:>=2020`,
//! `AND`/`OR`/`NOT` connectives. Lucene has no native `IN`; membership
//! expands into a parenthesized OR-chain of equality terms, one per list
//! element in the original order.
//!
//! The colon syntax is positional rather than infix, so this dialect
//! walks the tree directly instead of going through the token-table
//! engine.

use crate::ast::{Expression, ExpressionType, FilterValue, Key, Operand};
use crate::datetime::format_rfc3339_utc;
use crate::dialect::{escape_backslash, format_decimal, FilterDialect, RenderedFilter};
use crate::error::{FilterError, FilterResult};
use crate::schema::FilterSchema;

/// Lucene query-string renderer for Elasticsearch.
#[derive(Default)]
pub struct ElasticsearchDialect {
    schema: Option<FilterSchema>,
}

impl ElasticsearchDialect {
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

impl FilterDialect for ElasticsearchDialect {
    fn name(&self) -> &'static str {
        "elastic"
    }

    fn render(&self, expr: &Expression) -> FilterResult<RenderedFilter> {
        let prepared = super::prepared(expr, self.schema.as_ref(), true)?;
        render_expression(&prepared).map(RenderedFilter::Text)
    }
}

fn render_expression(expr: &Expression) -> FilterResult<String> {
    match expr.op {
        ExpressionType::And | ExpressionType::Or => {
            let token = if expr.op == ExpressionType::And {
                "AND"
            } else {
                "OR"
            };
            let left = render_operand(&expr.left)?;
            let right = match &expr.right {
                Some(right) => render_operand(right)?,
                None => return Err(malformed(expr.op)),
            };
            Ok(format!("{} {} {}", left, token, right))
        }
        ExpressionType::Not => Ok(format!("NOT {}", render_operand(&expr.left)?)),
        ExpressionType::Eq => {
            let (key, value) = expect_comparison(expr)?;
            Ok(format!("{}:{}", field(key), scalar(value)?))
        }
        ExpressionType::Ne => {
            let (key, value) = expect_comparison(expr)?;
            Ok(format!("NOT {}:{}", field(key), scalar(value)?))
        }
        ExpressionType::Lt | ExpressionType::Lte | ExpressionType::Gt | ExpressionType::Gte => {
            let token = match expr.op {
                ExpressionType::Lt => "<",
                ExpressionType::Lte => "<=",
                ExpressionType::Gt => ">",
                _ => ">=",
            };
            let (key, value) = expect_comparison(expr)?;
            Ok(format!("{}:{}{}", field(key), token, scalar(value)?))
        }
        ExpressionType::In | ExpressionType::Nin => render_membership(expr),
    }
}

fn render_operand(operand: &Operand) -> FilterResult<String> {
    match operand {
        Operand::Expression(inner) => render_expression(inner),
        Operand::Group(group) => Ok(format!("({})", render_expression(&group.content)?)),
        _ => Err(malformed(ExpressionType::And)),
    }
}

/// Membership as an equality chain: exactly one `field:value` term per
/// list element, joined by the OR token, in list order.
fn render_membership(expr: &Expression) -> FilterResult<String> {
    let key = match expr.left.as_ref() {
        Operand::Key(key) => key,
        _ => return Err(malformed(expr.op)),
    };
    let items = match expr.right.as_deref() {
        Some(Operand::Value(FilterValue::List(items))) if !items.is_empty() => items,
        Some(Operand::Value(FilterValue::List(_))) => return Err(FilterError::EmptyMembershipList),
        _ => return Err(malformed(expr.op)),
    };

    let chain = items
        .iter()
        .map(|item| Ok(format!("{}:{}", field(key), scalar(item)?)))
        .collect::<FilterResult<Vec<_>>>()?
        .join(" OR ");

    if expr.op == ExpressionType::In {
        Ok(format!("({})", chain))
    } else {
        Ok(format!("NOT ({})", chain))
    }
}

fn field(key: &Key) -> String {
    format!("metadata.{}", key.unquoted())
}

fn scalar(value: &FilterValue) -> FilterResult<String> {
    match value {
        FilterValue::Text(text) => Ok(format!("\"{}\"", escape_backslash(text, '"'))),
        FilterValue::Int(value) => Ok(value.to_string()),
        FilterValue::Decimal(value) => format_decimal(*value),
        FilterValue::Bool(value) => Ok(value.to_string()),
        FilterValue::Date(date) => Ok(format!("\"{}\"", format_rfc3339_utc(date))),
        FilterValue::List(_) => Err(malformed(ExpressionType::Eq)),
    }
}

fn expect_comparison(expr: &Expression) -> FilterResult<(&Key, &FilterValue)> {
    let key = match expr.left.as_ref() {
        Operand::Key(key) => key,
        _ => return Err(malformed(expr.op)),
    };
    match expr.right.as_deref() {
        Some(Operand::Value(value)) if !value.is_list() => Ok((key, value)),
        _ => Err(malformed(expr.op)),
    }
}

fn malformed(op: ExpressionType) -> FilterError {
    FilterError::MalformedOperand {
        op,
        message: "operand shape does not fit the operator".to_string(),
    }
}
