//! Weaviate GraphQL `where` dialect.
//!
//! Emits Weaviate operand blocks over `meta_<field>` properties with
//! typed value keys:
//!
//! ```text
//! {operator:And operands:[{path:["meta_country"] operator:Equal valueText:"BG"}, ...]}
//! ```
//!
//! Weaviate has no membership operator; `IN` expands to an Or-chain of
//! `Equal` operands and `NIN` to an And-chain of `NotEqual` operands,
//! one per list element in the original order. There is no negation
//! operator either, so explicit `NOT` is rewritten away first.

use crate::ast::{Expression, ExpressionType, FilterValue, Key, Operand};
use crate::datetime::format_rfc3339_utc;
use crate::dialect::{escape_backslash, format_decimal, FilterDialect, RenderedFilter};
use crate::error::{FilterError, FilterResult};
use crate::schema::FilterSchema;

/// GraphQL `where` renderer for Weaviate.
#[derive(Default)]
pub struct WeaviateDialect {
    schema: Option<FilterSchema>,
}

impl WeaviateDialect {
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

impl FilterDialect for WeaviateDialect {
    fn name(&self) -> &'static str {
        "weaviate"
    }

    fn render(&self, expr: &Expression) -> FilterResult<RenderedFilter> {
        let prepared = super::prepared(expr, self.schema.as_ref(), false)?;
        render_expression(&prepared).map(RenderedFilter::Text)
    }
}

fn render_expression(expr: &Expression) -> FilterResult<String> {
    match expr.op {
        ExpressionType::And | ExpressionType::Or => {
            let op = if expr.op == ExpressionType::And {
                "And"
            } else {
                "Or"
            };
            let left = render_operand(&expr.left)?;
            let right = match &expr.right {
                Some(right) => render_operand(right)?,
                None => return Err(malformed(expr.op)),
            };
            Ok(format!("{{operator:{} operands:[{}, {}]}}", op, left, right))
        }
        ExpressionType::Not => Err(FilterError::UnsupportedOperator(expr.op, "weaviate")),
        ExpressionType::In | ExpressionType::Nin => render_membership(expr),
        op => {
            let token = comparison_operator(op)?;
            let (key, value) = expect_comparison(expr)?;
            operand_block(key, token, value)
        }
    }
}

fn render_operand(operand: &Operand) -> FilterResult<String> {
    match operand {
        Operand::Expression(inner) => render_expression(inner),
        // Operand nesting already encodes precedence
        Operand::Group(group) => render_expression(&group.content),
        _ => Err(malformed(ExpressionType::And)),
    }
}

/// Membership as a connective chain of (Not)Equal operand blocks.
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

    let (connective, comparison) = if expr.op == ExpressionType::In {
        ("Or", "Equal")
    } else {
        ("And", "NotEqual")
    };

    if items.len() == 1 {
        return operand_block(key, comparison, &items[0]);
    }

    let blocks = items
        .iter()
        .map(|item| operand_block(key, comparison, item))
        .collect::<FilterResult<Vec<_>>>()?
        .join(", ");
    Ok(format!("{{operator:{} operands:[{}]}}", connective, blocks))
}

fn operand_block(key: &Key, operator: &str, value: &FilterValue) -> FilterResult<String> {
    let (value_key, rendered) = typed_value(value)?;
    Ok(format!(
        "{{path:[\"meta_{}\"] operator:{} {}:{}}}",
        key.unquoted(),
        operator,
        value_key,
        rendered
    ))
}

fn typed_value(value: &FilterValue) -> FilterResult<(&'static str, String)> {
    match value {
        FilterValue::Text(text) => Ok((
            "valueText",
            format!("\"{}\"", escape_backslash(text, '"')),
        )),
        FilterValue::Int(value) => Ok(("valueInt", value.to_string())),
        FilterValue::Decimal(value) => Ok(("valueNumber", format_decimal(*value)?)),
        FilterValue::Bool(value) => Ok(("valueBoolean", value.to_string())),
        FilterValue::Date(date) => Ok((
            "valueDate",
            format!("\"{}\"", format_rfc3339_utc(date)),
        )),
        FilterValue::List(_) => Err(malformed(ExpressionType::Eq)),
    }
}

fn comparison_operator(op: ExpressionType) -> FilterResult<&'static str> {
    match op {
        ExpressionType::Eq => Ok("Equal"),
        ExpressionType::Ne => Ok("NotEqual"),
        ExpressionType::Lt => Ok("LessThan"),
        ExpressionType::Lte => Ok("LessThanEqual"),
        ExpressionType::Gt => Ok("GreaterThan"),
        ExpressionType::Gte => Ok("GreaterThanEqual"),
        _ => Err(malformed(op)),
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
