//! Local predicate evaluation.
//!
//! Applies a filter expression directly to a document's metadata map.
//! Used by in-memory stores that filter before similarity scoring rather
//! than pushing the predicate to a backend query language.
//!
//! A leaf predicate over a field absent from the metadata map evaluates
//! to `false`, whatever the operator; `NOT` still inverts the result of
//! its operand.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;

use crate::ast::{Expression, ExpressionType, FilterValue, Operand};
use crate::datetime::parse_date_text;
use crate::error::{FilterError, FilterResult};

/// Evaluate an expression against a metadata map.
pub fn matches(expr: &Expression, metadata: &HashMap<String, Value>) -> FilterResult<bool> {
    match expr.op {
        ExpressionType::And => {
            Ok(operand_matches(&expr.left, metadata)? && right_matches(expr, metadata)?)
        }
        ExpressionType::Or => {
            Ok(operand_matches(&expr.left, metadata)? || right_matches(expr, metadata)?)
        }
        ExpressionType::Not => Ok(!operand_matches(&expr.left, metadata)?),
        _ => leaf_matches(expr, metadata),
    }
}

fn right_matches(expr: &Expression, metadata: &HashMap<String, Value>) -> FilterResult<bool> {
    match &expr.right {
        Some(right) => operand_matches(right, metadata),
        None => Err(FilterError::MalformedOperand {
            op: expr.op,
            message: "missing right operand".to_string(),
        }),
    }
}

fn operand_matches(operand: &Operand, metadata: &HashMap<String, Value>) -> FilterResult<bool> {
    match operand {
        Operand::Expression(inner) => matches(inner, metadata),
        Operand::Group(group) => matches(&group.content, metadata),
        _ => Err(FilterError::MalformedOperand {
            op: ExpressionType::And,
            message: "logical operand must be an expression or group".to_string(),
        }),
    }
}

fn leaf_matches(expr: &Expression, metadata: &HashMap<String, Value>) -> FilterResult<bool> {
    let key = match expr.left.as_ref() {
        Operand::Key(key) => key,
        _ => {
            return Err(FilterError::MalformedOperand {
                op: expr.op,
                message: "left operand must be a field identifier".to_string(),
            })
        }
    };
    let value = match expr.right.as_deref() {
        Some(Operand::Value(value)) => value,
        _ => {
            return Err(FilterError::MalformedOperand {
                op: expr.op,
                message: "right operand must be a literal".to_string(),
            })
        }
    };

    let field = match metadata.get(key.unquoted()) {
        Some(field) => field,
        None => return Ok(false),
    };

    match expr.op {
        ExpressionType::Eq => Ok(value_eq(value, field)),
        ExpressionType::Ne => Ok(!value_eq(value, field)),
        ExpressionType::Lt => Ok(value_cmp(value, field) == Some(Ordering::Less)),
        ExpressionType::Lte => Ok(matches!(
            value_cmp(value, field),
            Some(Ordering::Less | Ordering::Equal)
        )),
        ExpressionType::Gt => Ok(value_cmp(value, field) == Some(Ordering::Greater)),
        ExpressionType::Gte => Ok(matches!(
            value_cmp(value, field),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        ExpressionType::In => membership(value, field, expr.op),
        ExpressionType::Nin => Ok(!membership(value, field, expr.op)?),
        op => Err(FilterError::MalformedOperand {
            op,
            message: "unexpected logical operator in leaf position".to_string(),
        }),
    }
}

fn membership(value: &FilterValue, field: &Value, op: ExpressionType) -> FilterResult<bool> {
    match value {
        FilterValue::List(items) => {
            if items.is_empty() {
                return Err(FilterError::EmptyMembershipList);
            }
            Ok(items.iter().any(|item| value_eq(item, field)))
        }
        _ => Err(FilterError::MalformedOperand {
            op,
            message: "membership operand must be a list of values".to_string(),
        }),
    }
}

/// Equality between a filter literal and a metadata value, with numeric
/// coercion between integers and floats.
fn value_eq(value: &FilterValue, field: &Value) -> bool {
    match (value, field) {
        (FilterValue::Text(s), Value::String(f)) => s == f,
        (FilterValue::Bool(b), Value::Bool(f)) => b == f,
        (FilterValue::Int(i), Value::Number(n)) => {
            n.as_i64().is_some_and(|f| *i == f)
                || n.as_f64().is_some_and(|f| (*i as f64 - f).abs() < f64::EPSILON)
        }
        (FilterValue::Decimal(d), Value::Number(n)) => {
            n.as_f64().is_some_and(|f| (*d - f).abs() < f64::EPSILON)
        }
        (FilterValue::Date(dt), Value::String(f)) => {
            parse_date_text(f).map(|parsed| parsed == *dt).unwrap_or(false)
        }
        _ => false,
    }
}

/// Ordering between a filter literal and a metadata value. Numbers compare
/// numerically, dates compare chronologically; everything else is
/// unordered.
fn value_cmp(value: &FilterValue, field: &Value) -> Option<Ordering> {
    match value {
        FilterValue::Int(i) => {
            let field = field.as_f64()?;
            field.partial_cmp(&(*i as f64))
        }
        FilterValue::Decimal(d) => {
            let field = field.as_f64()?;
            field.partial_cmp(d)
        }
        FilterValue::Date(dt) => {
            let field = field.as_str()?;
            let parsed = parse_date_text(field).ok()?;
            Some(parsed.cmp(dt))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{eq, group, gte, in_list, lt, ne, nin_list};
    use serde_json::json;

    fn metadata() -> HashMap<String, Value> {
        let mut map = HashMap::new();
        map.insert("country".to_string(), json!("BG"));
        map.insert("year".to_string(), json!(2021));
        map.insert("rating".to_string(), json!(4.5));
        map.insert("isOpen".to_string(), json!(true));
        map
    }

    #[test]
    fn test_eq_string() {
        assert!(matches(&eq("country", "BG"), &metadata()).unwrap());
        assert!(!matches(&eq("country", "NL"), &metadata()).unwrap());
    }

    #[test]
    fn test_numeric_comparison() {
        assert!(matches(&gte("year", 2020), &metadata()).unwrap());
        assert!(!matches(&lt("year", 2000), &metadata()).unwrap());
    }

    #[test]
    fn test_int_filter_against_float_field() {
        assert!(matches(&gte("rating", 4), &metadata()).unwrap());
    }

    #[test]
    fn test_missing_field_is_false_for_every_leaf() {
        let meta = metadata();
        assert!(!matches(&eq("missing", "x"), &meta).unwrap());
        assert!(!matches(&ne("missing", "x"), &meta).unwrap());
        assert!(!matches(&in_list("missing", ["x"]), &meta).unwrap());
        assert!(!matches(&nin_list("missing", ["x"]), &meta).unwrap());
    }

    #[test]
    fn test_not_inverts_missing_field() {
        assert!(matches(&eq("missing", "x").negate(), &metadata()).unwrap());
    }

    #[test]
    fn test_membership() {
        assert!(matches(&in_list("country", ["BG", "NL"]), &metadata()).unwrap());
        assert!(!matches(&nin_list("country", ["BG", "NL"]), &metadata()).unwrap());
    }

    #[test]
    fn test_boolean_connectives() {
        let expr = eq("isOpen", true).and(gte("year", 2020));
        assert!(matches(&expr, &metadata()).unwrap());

        let expr = eq("country", "NL").or(gte("year", 2020));
        assert!(matches(&expr, &metadata()).unwrap());
    }

    #[test]
    fn test_group_evaluates_content() {
        let expr = group(eq("country", "NL").or(gte("year", 2020))).and(eq("isOpen", true));
        assert!(matches(&expr, &metadata()).unwrap());
    }

    #[test]
    fn test_date_comparison() {
        let mut meta = metadata();
        meta.insert("published".to_string(), json!("2021-06-15T00:00:00Z"));
        let cutoff = parse_date_text("2021-01-01").unwrap();
        let expr = gte("published", cutoff);
        assert!(matches(&expr, &meta).unwrap());
    }

    #[test]
    fn test_empty_membership_list_is_error() {
        let expr = Expression::new(
            ExpressionType::In,
            crate::ast::Key::new("country"),
            FilterValue::List(vec![]),
        );
        assert!(matches(&expr, &metadata()).is_err());
    }
}
