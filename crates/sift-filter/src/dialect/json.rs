//! Generic engine for Mongo-style operator-document dialects.
//!
//! Renders `{"field": {"$op": value}}` trees as strings. Per-target
//! differences are a [`JsonDialect`] configuration: key prefix, whether
//! `$` operators are quoted (strict JSON) or bare (Mongo shell syntax),
//! and whether a space follows each colon. These targets have no native
//! negation operator, so negation push-down always runs first.

use crate::ast::{Expression, ExpressionType, FilterValue, Key, Operand};
use crate::datetime::{format_rfc3339_utc, looks_like_date, parse_date_text};
use crate::dialect::{escape_backslash, format_decimal};
use crate::error::{FilterError, FilterResult};
use crate::schema::{FieldKind, FilterSchema};

/// Configuration of one operator-document dialect.
#[derive(Debug, Clone, Copy)]
pub struct JsonDialect {
    pub name: &'static str,
    /// Prefix applied to every field key (`metadata.` for stores that
    /// nest document metadata under a fixed attribute).
    pub key_prefix: &'static str,
    /// Quote `$and`/`$eq`/... keys (strict JSON) or leave them bare
    /// (Mongo shell spelling).
    pub quote_operators: bool,
    /// Emit `": "` after keys instead of `":"`.
    pub space_after_key: bool,
}

impl JsonDialect {
    fn op_key(&self, name: &str) -> String {
        if self.quote_operators {
            format!("\"{}\"", name)
        } else {
            name.to_string()
        }
    }

    fn colon(&self) -> &'static str {
        if self.space_after_key {
            ": "
        } else {
            ":"
        }
    }
}

/// Render an expression through an operator-document configuration.
pub(crate) fn render(
    dialect: &JsonDialect,
    expr: &Expression,
    schema: Option<&FilterSchema>,
) -> FilterResult<String> {
    let prepared = super::prepared(expr, schema, false)?;
    render_expression(dialect, &prepared, schema)
}

fn render_expression(
    dialect: &JsonDialect,
    expr: &Expression,
    schema: Option<&FilterSchema>,
) -> FilterResult<String> {
    match expr.op {
        ExpressionType::And | ExpressionType::Or => {
            let op = if expr.op == ExpressionType::And {
                "$and"
            } else {
                "$or"
            };
            let left = render_operand(dialect, &expr.left, schema)?;
            let right = match &expr.right {
                Some(right) => render_operand(dialect, right, schema)?,
                None => return Err(malformed(expr.op)),
            };
            Ok(format!(
                "{{{}{}[{},{}]}}",
                dialect.op_key(op),
                dialect.colon(),
                left,
                right
            ))
        }
        // Negation push-down has already rewritten NOT away
        ExpressionType::Not => Err(FilterError::UnsupportedOperator(expr.op, dialect.name)),
        ExpressionType::In | ExpressionType::Nin => {
            let op = if expr.op == ExpressionType::In {
                "$in"
            } else {
                "$nin"
            };
            let (key, kind) = expect_key(expr, schema)?;
            let items = match expr.right.as_deref() {
                Some(Operand::Value(FilterValue::List(items))) if !items.is_empty() => items,
                Some(Operand::Value(FilterValue::List(_))) => {
                    return Err(FilterError::EmptyMembershipList)
                }
                _ => return Err(malformed(expr.op)),
            };
            let list = items
                .iter()
                .map(|item| render_value(kind, item))
                .collect::<FilterResult<Vec<_>>>()?
                .join(",");
            Ok(wrap_predicate(dialect, key, op, &format!("[{}]", list)))
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
            let (key, kind) = expect_key(expr, schema)?;
            let value = match expr.right.as_deref() {
                Some(Operand::Value(value)) if !value.is_list() => value,
                _ => return Err(malformed(op)),
            };
            let rendered = render_value(kind, value)?;
            Ok(wrap_predicate(dialect, key, token, &rendered))
        }
    }
}

fn render_operand(
    dialect: &JsonDialect,
    operand: &Operand,
    schema: Option<&FilterSchema>,
) -> FilterResult<String> {
    match operand {
        Operand::Expression(inner) => render_expression(dialect, inner, schema),
        // Nesting already encodes precedence in a document tree
        Operand::Group(group) => render_expression(dialect, &group.content, schema),
        _ => Err(malformed(ExpressionType::And)),
    }
}

fn wrap_predicate(dialect: &JsonDialect, key: &Key, op: &str, value: &str) -> String {
    format!(
        "{{\"{}{}\"{}{{{}{}{}}}}}",
        dialect.key_prefix,
        escape_backslash(key.unquoted(), '"'),
        dialect.colon(),
        dialect.op_key(op),
        dialect.colon(),
        value
    )
}

fn render_value(kind: Option<FieldKind>, value: &FilterValue) -> FilterResult<String> {
    match value {
        FilterValue::Text(text) => {
            if kind == Some(FieldKind::Date) && looks_like_date(text) {
                let date = parse_date_text(text)?;
                Ok(format!("\"{}\"", format_rfc3339_utc(&date)))
            } else {
                Ok(format!("\"{}\"", escape_backslash(text, '"')))
            }
        }
        FilterValue::Int(value) => Ok(value.to_string()),
        FilterValue::Decimal(value) => format_decimal(*value),
        FilterValue::Bool(value) => Ok(value.to_string()),
        FilterValue::Date(date) => Ok(format!("\"{}\"", format_rfc3339_utc(date))),
        FilterValue::List(_) => Err(malformed(ExpressionType::Eq)),
    }
}

fn expect_key<'a>(
    expr: &'a Expression,
    schema: Option<&FilterSchema>,
) -> FilterResult<(&'a Key, Option<FieldKind>)> {
    match expr.left.as_ref() {
        Operand::Key(key) => {
            let kind = schema
                .and_then(|s| s.field(key.unquoted()))
                .map(|field| field.kind);
            Ok((key, kind))
        }
        _ => Err(malformed(expr.op)),
    }
}

fn malformed(op: ExpressionType) -> FilterError {
    FilterError::MalformedOperand {
        op,
        message: "operand shape does not fit the operator".to_string(),
    }
}
