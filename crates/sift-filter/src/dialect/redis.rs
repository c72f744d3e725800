//! RediSearch dialect.
//!
//! Emits RediSearch query fragments: tag matches `@country:{BG}`, numeric
//! ranges `@year:[2020 +inf]`, space-joined conjunction, ` | ` for
//! alternation, and `-` for negation. Membership renders as tag
//! alternation `@genre:{comedy|drama}`, which assumes the field is
//! indexed as a TAG. Dates become epoch-second numeric ranges.

use chrono::{DateTime, Utc};

use crate::ast::{Expression, ExpressionType, FilterValue, Key, Operand};
use crate::dialect::{format_decimal, FilterDialect, RenderedFilter};
use crate::error::{FilterError, FilterResult};
use crate::schema::FilterSchema;

/// RediSearch query renderer.
#[derive(Default)]
pub struct RedisDialect {
    schema: Option<FilterSchema>,
}

impl RedisDialect {
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

impl FilterDialect for RedisDialect {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn render(&self, expr: &Expression) -> FilterResult<RenderedFilter> {
        let prepared = super::prepared(expr, self.schema.as_ref(), true)?;
        render_expression(&prepared).map(RenderedFilter::Text)
    }
}

fn render_expression(expr: &Expression) -> FilterResult<String> {
    match expr.op {
        ExpressionType::And => {
            let left = render_operand(&expr.left)?;
            let right = render_right(expr)?;
            Ok(format!("{} {}", left, right))
        }
        ExpressionType::Or => {
            let left = render_operand(&expr.left)?;
            let right = render_right(expr)?;
            Ok(format!("{} | {}", left, right))
        }
        ExpressionType::Not => match expr.left.as_ref() {
            // Avoid doubled parentheses around an explicit group
            Operand::Group(group) => Ok(format!("-({})", render_expression(&group.content)?)),
            Operand::Expression(inner) => Ok(format!("-({})", render_expression(inner)?)),
            _ => Err(malformed(expr.op)),
        },
        ExpressionType::Eq => {
            let (key, value) = expect_comparison(expr)?;
            predicate(key, value, false)
        }
        ExpressionType::Ne => {
            let (key, value) = expect_comparison(expr)?;
            predicate(key, value, true)
        }
        ExpressionType::Lt | ExpressionType::Lte | ExpressionType::Gt | ExpressionType::Gte => {
            let (key, value) = expect_comparison(expr)?;
            let bound = numeric(value)?;
            let range = match expr.op {
                ExpressionType::Lt => format!("[-inf ({}]", bound),
                ExpressionType::Lte => format!("[-inf {}]", bound),
                ExpressionType::Gt => format!("[({} +inf]", bound),
                _ => format!("[{} +inf]", bound),
            };
            Ok(format!("@{}:{}", key.unquoted(), range))
        }
        ExpressionType::In | ExpressionType::Nin => render_membership(expr),
    }
}

fn render_right(expr: &Expression) -> FilterResult<String> {
    match &expr.right {
        Some(right) => render_operand(right),
        None => Err(malformed(expr.op)),
    }
}

fn render_operand(operand: &Operand) -> FilterResult<String> {
    match operand {
        Operand::Expression(inner) => render_expression(inner),
        Operand::Group(group) => Ok(format!("({})", render_expression(&group.content)?)),
        _ => Err(malformed(ExpressionType::And)),
    }
}

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

    let alternation = items
        .iter()
        .map(tag_text)
        .collect::<FilterResult<Vec<_>>>()?
        .join("|");
    let tag = format!("@{}:{{{}}}", key.unquoted(), alternation);

    if expr.op == ExpressionType::In {
        Ok(tag)
    } else {
        Ok(format!("-{}", tag))
    }
}

/// Leaf equality: tag match for text/bool, single-point range for numbers.
fn predicate(key: &Key, value: &FilterValue, negated: bool) -> FilterResult<String> {
    let sign = if negated { "-" } else { "" };
    match value {
        FilterValue::Int(_) | FilterValue::Decimal(_) | FilterValue::Date(_) => {
            let bound = numeric(value)?;
            Ok(format!("{}@{}:[{} {}]", sign, key.unquoted(), bound, bound))
        }
        _ => Ok(format!(
            "{}@{}:{{{}}}",
            sign,
            key.unquoted(),
            tag_text(value)?
        )),
    }
}

fn numeric(value: &FilterValue) -> FilterResult<String> {
    match value {
        FilterValue::Int(value) => Ok(value.to_string()),
        FilterValue::Decimal(value) => format_decimal(*value),
        FilterValue::Date(date) => Ok(epoch_seconds(date)),
        _ => Err(malformed(ExpressionType::Gt)),
    }
}

fn epoch_seconds(date: &DateTime<Utc>) -> String {
    date.timestamp().to_string()
}

fn tag_text(value: &FilterValue) -> FilterResult<String> {
    match value {
        FilterValue::Text(text) => Ok(escape_tag(text)),
        FilterValue::Bool(value) => Ok(value.to_string()),
        FilterValue::Int(value) => Ok(value.to_string()),
        FilterValue::Decimal(value) => format_decimal(*value),
        FilterValue::Date(date) => Ok(epoch_seconds(date)),
        FilterValue::List(_) => Err(malformed(ExpressionType::In)),
    }
}

/// Escape the characters RediSearch treats as syntax inside tag values.
fn escape_tag(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, ' ' | ',' | '{' | '}' | '|' | '\'' | '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{eq, group, gt, gte, in_list, lt, lte, ne, nin_list};

    fn render(expr: &Expression) -> String {
        RedisDialect::new().render(expr).unwrap().into_text().unwrap()
    }

    #[test]
    fn test_eq_tag() {
        assert_eq!(render(&eq("country", "BG")), "@country:{BG}");
    }

    #[test]
    fn test_eq_numeric() {
        assert_eq!(render(&eq("year", 2020)), "@year:[2020 2020]");
    }

    #[test]
    fn test_ne() {
        assert_eq!(render(&ne("country", "BG")), "-@country:{BG}");
    }

    #[test]
    fn test_ranges() {
        assert_eq!(render(&gte("year", 2020)), "@year:[2020 +inf]");
        assert_eq!(render(&gt("year", 2020)), "@year:[(2020 +inf]");
        assert_eq!(render(&lte("year", 2020)), "@year:[-inf 2020]");
        assert_eq!(render(&lt("year", 2020)), "@year:[-inf (2020]");
    }

    #[test]
    fn test_and_is_space_joined() {
        let expr = eq("genre", "drama").and(gte("year", 2020));
        assert_eq!(render(&expr), "@genre:{drama} @year:[2020 +inf]");
    }

    #[test]
    fn test_or_is_pipe_joined() {
        let expr = eq("country", "BG").or(eq("country", "NL"));
        assert_eq!(render(&expr), "@country:{BG} | @country:{NL}");
    }

    #[test]
    fn test_in_alternation() {
        let expr = in_list("genre", ["comedy", "documentary", "drama"]);
        assert_eq!(render(&expr), "@genre:{comedy|documentary|drama}");
    }

    #[test]
    fn test_nin() {
        let expr = nin_list("city", ["Sofia", "Plovdiv"]);
        assert_eq!(render(&expr), "-@city:{Sofia|Plovdiv}");
    }

    #[test]
    fn test_group_and_not() {
        let expr = group(eq("country", "BG").or(eq("country", "NL"))).and(gte("year", 2020));
        assert_eq!(
            render(&expr),
            "(@country:{BG} | @country:{NL}) @year:[2020 +inf]"
        );

        let negated = group(eq("country", "BG")).negate();
        assert_eq!(render(&negated), "-(@country:{BG})");
    }

    #[test]
    fn test_tag_escaping() {
        assert_eq!(render(&eq("city", "New York")), "@city:{New\\ York}");
    }

    #[test]
    fn test_boolean_tag() {
        assert_eq!(render(&eq("isOpen", true)), "@isOpen:{true}");
    }
}
