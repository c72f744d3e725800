//! Generic engine for infix text dialects.
//!
//! One recursive traversal renders every infix syntax; per-target
//! differences live entirely in a [`TextDialect`] configuration: the
//! operator-token table, the key emission style, the string quoting rule,
//! the membership strategy, and the date spelling. Adding an infix target
//! means writing a configuration, not a traversal.

use crate::ast::{Expression, ExpressionType, FilterValue, Key, Operand};
use crate::datetime::{format_rfc3339_utc, looks_like_date, parse_date_text};
use crate::dialect::{escape_backslash, escape_doubling, format_decimal};
use crate::error::{FilterError, FilterResult};
use crate::schema::{FieldKind, FilterSchema};

/// Operator spellings for one target syntax.
#[derive(Debug, Clone, Copy)]
pub struct OperatorTokens {
    pub and: &'static str,
    pub or: &'static str,
    pub not: &'static str,
    pub eq: &'static str,
    pub ne: &'static str,
    pub lt: &'static str,
    pub lte: &'static str,
    pub gt: &'static str,
    pub gte: &'static str,
}

impl OperatorTokens {
    fn comparison(&self, op: ExpressionType) -> Option<&'static str> {
        match op {
            ExpressionType::Eq => Some(self.eq),
            ExpressionType::Ne => Some(self.ne),
            ExpressionType::Lt => Some(self.lt),
            ExpressionType::Lte => Some(self.lte),
            ExpressionType::Gt => Some(self.gt),
            ExpressionType::Gte => Some(self.gte),
            _ => None,
        }
    }
}

/// How field identifiers are emitted.
#[derive(Debug, Clone, Copy)]
pub enum KeyStyle {
    /// `meta_country`, quoted as `'meta_country 1 2 3'` when the name
    /// contains characters outside `[A-Za-z0-9_]`.
    Prefixed {
        prefix: &'static str,
        quote_if_special: Option<char>,
    },
    /// `metadata["country"]`
    Bracketed { target: &'static str },
    /// `` node.`metadata.country` ``
    Backticked {
        object: &'static str,
        prefix: &'static str,
    },
    /// `metadata->>'country'`
    JsonArrow { column: &'static str },
}

/// String literal quoting.
#[derive(Debug, Clone, Copy)]
pub struct StringStyle {
    pub quote: char,
    pub escape: EscapeStyle,
}

/// How the quote character is escaped inside string literals.
#[derive(Debug, Clone, Copy)]
pub enum EscapeStyle {
    /// `\'` / `\"` with `\\` for backslashes
    Backslash,
    /// `''` (SQL/OData convention); backslashes stay literal
    Doubling,
}

/// Date literal spelling.
#[derive(Debug, Clone, Copy)]
pub enum DateStyle {
    /// Bare RFC 3339 timestamp: `1970-01-01T00:00:02Z`
    Rfc3339Bare,
    /// RFC 3339 timestamp inside the dialect's string quotes
    QuotedText,
}

/// How `IN`/`NIN` operand sets are emitted.
#[derive(Debug, Clone, Copy)]
pub enum MembershipStyle {
    /// Native list: `in ["a","b"]`, `IN ('a','b')`. When `nin_token` is
    /// `None` the dialect has no direct NOT-IN and emits
    /// `{not} {key} {in_token} {list}` instead.
    Delimited {
        open: &'static str,
        close: &'static str,
        sep: &'static str,
        in_token: &'static str,
        nin_token: Option<&'static str>,
    },
    /// OData function call: `search.in(meta_genre, 'comedy,drama', ',')`
    SearchIn,
}

/// Complete configuration of one infix text dialect.
#[derive(Debug, Clone, Copy)]
pub struct TextDialect {
    pub name: &'static str,
    pub tokens: OperatorTokens,
    pub key_style: KeyStyle,
    pub string_style: StringStyle,
    pub membership: MembershipStyle,
    pub date_style: DateStyle,
    /// Whether the target can spell `NOT` directly; if not, negation
    /// push-down runs before rendering.
    pub native_negation: bool,
}

/// Render an expression through a text dialect configuration.
pub(crate) fn render(
    dialect: &TextDialect,
    expr: &Expression,
    schema: Option<&FilterSchema>,
) -> FilterResult<String> {
    let prepared = super::prepared(expr, schema, dialect.native_negation)?;
    render_expression(dialect, &prepared, schema)
}

fn render_expression(
    dialect: &TextDialect,
    expr: &Expression,
    schema: Option<&FilterSchema>,
) -> FilterResult<String> {
    match expr.op {
        ExpressionType::And | ExpressionType::Or => {
            let token = if expr.op == ExpressionType::And {
                dialect.tokens.and
            } else {
                dialect.tokens.or
            };
            let left = render_operand(dialect, &expr.left, schema)?;
            let right = match &expr.right {
                Some(right) => render_operand(dialect, right, schema)?,
                None => return Err(missing_operand(expr.op)),
            };
            Ok(format!("{} {} {}", left, token, right))
        }
        ExpressionType::Not => {
            let inner = render_operand(dialect, &expr.left, schema)?;
            Ok(format!("{} {}", dialect.tokens.not, inner))
        }
        ExpressionType::In | ExpressionType::Nin => render_membership(dialect, expr, schema),
        op => {
            let token = dialect
                .tokens
                .comparison(op)
                .ok_or_else(|| missing_operand(op))?;
            let (key, kind) = expect_key(expr, schema)?;
            let value = expect_scalar(expr)?;
            let rendered = render_scalar(dialect, kind, value)?;
            Ok(format!("{} {} {}", render_key(dialect, key), token, rendered))
        }
    }
}

fn render_operand(
    dialect: &TextDialect,
    operand: &Operand,
    schema: Option<&FilterSchema>,
) -> FilterResult<String> {
    match operand {
        Operand::Expression(inner) => render_expression(dialect, inner, schema),
        Operand::Group(group) => Ok(format!(
            "({})",
            render_expression(dialect, &group.content, schema)?
        )),
        _ => Err(missing_operand(ExpressionType::And)),
    }
}

fn render_membership(
    dialect: &TextDialect,
    expr: &Expression,
    schema: Option<&FilterSchema>,
) -> FilterResult<String> {
    let (key, kind) = expect_key(expr, schema)?;
    let items = match expr.right.as_deref() {
        Some(Operand::Value(FilterValue::List(items))) if !items.is_empty() => items,
        Some(Operand::Value(FilterValue::List(_))) => {
            return Err(FilterError::EmptyMembershipList)
        }
        _ => return Err(missing_operand(expr.op)),
    };
    let rendered_key = render_key(dialect, key);

    match dialect.membership {
        MembershipStyle::Delimited {
            open,
            close,
            sep,
            in_token,
            nin_token,
        } => {
            let list = items
                .iter()
                .map(|item| render_scalar(dialect, kind, item))
                .collect::<FilterResult<Vec<_>>>()?
                .join(sep);
            match (expr.op, nin_token) {
                (ExpressionType::In, _) => {
                    Ok(format!("{} {} {}{}{}", rendered_key, in_token, open, list, close))
                }
                (_, Some(token)) => {
                    Ok(format!("{} {} {}{}{}", rendered_key, token, open, list, close))
                }
                (_, None) => Ok(format!(
                    "{} {} {} {}{}{}",
                    dialect.tokens.not, rendered_key, in_token, open, list, close
                )),
            }
        }
        MembershipStyle::SearchIn => {
            let joined = items
                .iter()
                .map(|item| raw_scalar(dialect, kind, item))
                .collect::<FilterResult<Vec<_>>>()?
                .join(",");
            let call = format!("search.in({}, '{}', ',')", rendered_key, joined);
            if expr.op == ExpressionType::In {
                Ok(call)
            } else {
                Ok(format!("{} {}", dialect.tokens.not, call))
            }
        }
    }
}

fn render_key(dialect: &TextDialect, key: &Key) -> String {
    let name = key.unquoted();
    match dialect.key_style {
        KeyStyle::Prefixed {
            prefix,
            quote_if_special,
        } => {
            let full = format!("{}{}", prefix, name);
            match quote_if_special {
                Some(quote)
                    if full
                        .chars()
                        .any(|c| !c.is_ascii_alphanumeric() && c != '_') =>
                {
                    format!("{}{}{}", quote, full, quote)
                }
                _ => full,
            }
        }
        KeyStyle::Bracketed { target } => format!("{}[\"{}\"]", target, name),
        KeyStyle::Backticked { object, prefix } => {
            format!("{}.`{}{}`", object, prefix, name)
        }
        KeyStyle::JsonArrow { column } => format!("{}->>'{}'", column, name),
    }
}

fn render_scalar(
    dialect: &TextDialect,
    kind: Option<FieldKind>,
    value: &FilterValue,
) -> FilterResult<String> {
    match value {
        FilterValue::Text(text) => {
            if kind == Some(FieldKind::Date) && looks_like_date(text) {
                let date = parse_date_text(text)?;
                Ok(render_date(dialect, &date))
            } else {
                Ok(render_string(dialect, text))
            }
        }
        FilterValue::Int(value) => Ok(value.to_string()),
        FilterValue::Decimal(value) => format_decimal(*value),
        FilterValue::Bool(value) => Ok(value.to_string()),
        FilterValue::Date(date) => Ok(render_date(dialect, date)),
        FilterValue::List(_) => Err(missing_operand(ExpressionType::Eq)),
    }
}

/// Scalar without surrounding quotes, for `search.in` joined lists.
fn raw_scalar(
    dialect: &TextDialect,
    kind: Option<FieldKind>,
    value: &FilterValue,
) -> FilterResult<String> {
    match value {
        FilterValue::Text(text) => {
            if kind == Some(FieldKind::Date) && looks_like_date(text) {
                let date = parse_date_text(text)?;
                return Ok(format_rfc3339_utc(&date));
            }
            Ok(match dialect.string_style.escape {
                EscapeStyle::Backslash => escape_backslash(text, dialect.string_style.quote),
                EscapeStyle::Doubling => escape_doubling(text, dialect.string_style.quote),
            })
        }
        FilterValue::Int(value) => Ok(value.to_string()),
        FilterValue::Decimal(value) => format_decimal(*value),
        FilterValue::Bool(value) => Ok(value.to_string()),
        FilterValue::Date(date) => Ok(format_rfc3339_utc(date)),
        FilterValue::List(_) => Err(missing_operand(ExpressionType::In)),
    }
}

fn render_string(dialect: &TextDialect, text: &str) -> String {
    let quote = dialect.string_style.quote;
    let escaped = match dialect.string_style.escape {
        EscapeStyle::Backslash => escape_backslash(text, quote),
        EscapeStyle::Doubling => escape_doubling(text, quote),
    };
    format!("{}{}{}", quote, escaped, quote)
}

fn render_date(dialect: &TextDialect, date: &chrono::DateTime<chrono::Utc>) -> String {
    let canonical = format_rfc3339_utc(date);
    match dialect.date_style {
        DateStyle::Rfc3339Bare => canonical,
        DateStyle::QuotedText => {
            let quote = dialect.string_style.quote;
            format!("{}{}{}", quote, canonical, quote)
        }
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
        _ => Err(missing_operand(expr.op)),
    }
}

fn expect_scalar(expr: &Expression) -> FilterResult<&FilterValue> {
    match expr.right.as_deref() {
        Some(Operand::Value(value)) if !value.is_list() => Ok(value),
        _ => Err(missing_operand(expr.op)),
    }
}

fn missing_operand(op: ExpressionType) -> FilterError {
    FilterError::MalformedOperand {
        op,
        message: "operand shape does not fit the operator".to_string(),
    }
}
