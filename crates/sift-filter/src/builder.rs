//! Fluent construction of filter expression trees.
//!
//! Free constructors build the comparison leaves; combinator methods on
//! [`Expression`] chain them together:
//!
//! ```rust
//! use sift_filter::builder::{eq, gte, group, in_list};
//!
//! // genre == 'drama' && year >= 2020
//! let expr = eq("genre", "drama").and(gte("year", 2020));
//!
//! // (year >= 2020 || country == 'BG') && city in ['Sofia', 'Varna']
//! let expr = group(gte("year", 2020).or(eq("country", "BG")))
//!     .and(in_list("city", ["Sofia", "Varna"]));
//! ```

use crate::ast::{Expression, ExpressionType, FilterValue, Group, Key, Operand};

/// `key == value`
pub fn eq(key: impl Into<String>, value: impl Into<FilterValue>) -> Expression {
    compare(ExpressionType::Eq, key, value)
}

/// `key != value`
pub fn ne(key: impl Into<String>, value: impl Into<FilterValue>) -> Expression {
    compare(ExpressionType::Ne, key, value)
}

/// `key < value`
pub fn lt(key: impl Into<String>, value: impl Into<FilterValue>) -> Expression {
    compare(ExpressionType::Lt, key, value)
}

/// `key <= value`
pub fn lte(key: impl Into<String>, value: impl Into<FilterValue>) -> Expression {
    compare(ExpressionType::Lte, key, value)
}

/// `key > value`
pub fn gt(key: impl Into<String>, value: impl Into<FilterValue>) -> Expression {
    compare(ExpressionType::Gt, key, value)
}

/// `key >= value`
pub fn gte(key: impl Into<String>, value: impl Into<FilterValue>) -> Expression {
    compare(ExpressionType::Gte, key, value)
}

/// `key in [values...]`
pub fn in_list<V>(key: impl Into<String>, values: impl IntoIterator<Item = V>) -> Expression
where
    V: Into<FilterValue>,
{
    membership(ExpressionType::In, key, values)
}

/// `key not in [values...]`
pub fn nin_list<V>(key: impl Into<String>, values: impl IntoIterator<Item = V>) -> Expression
where
    V: Into<FilterValue>,
{
    membership(ExpressionType::Nin, key, values)
}

/// Wrap an expression in parentheses.
pub fn group(content: Expression) -> Group {
    Group::new(content)
}

/// `left && right` — free-function form for group-first chains.
pub fn and(left: impl Into<Operand>, right: impl Into<Operand>) -> Expression {
    Expression::new(ExpressionType::And, left, right)
}

/// `left || right` — free-function form for group-first chains.
pub fn or(left: impl Into<Operand>, right: impl Into<Operand>) -> Expression {
    Expression::new(ExpressionType::Or, left, right)
}

fn compare(
    op: ExpressionType,
    key: impl Into<String>,
    value: impl Into<FilterValue>,
) -> Expression {
    Expression::new(op, Key::new(key), value.into())
}

fn membership<V>(
    op: ExpressionType,
    key: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> Expression
where
    V: Into<FilterValue>,
{
    let list = FilterValue::List(values.into_iter().map(Into::into).collect());
    Expression::new(op, Key::new(key), list)
}

impl Expression {
    /// `self && other`
    pub fn and(self, other: impl Into<Operand>) -> Expression {
        Expression::new(ExpressionType::And, self, other)
    }

    /// `self || other`
    pub fn or(self, other: impl Into<Operand>) -> Expression {
        Expression::new(ExpressionType::Or, self, other)
    }

    /// `not self`
    pub fn negate(self) -> Expression {
        Expression::unary(ExpressionType::Not, self)
    }

    /// Wrap in parentheses.
    pub fn grouped(self) -> Group {
        Group::new(self)
    }
}

impl Group {
    /// `(self) && other`
    pub fn and(self, other: impl Into<Operand>) -> Expression {
        Expression::new(ExpressionType::And, self, other)
    }

    /// `(self) || other`
    pub fn or(self, other: impl Into<Operand>) -> Expression {
        Expression::new(ExpressionType::Or, self, other)
    }

    /// `not (self)`
    pub fn negate(self) -> Expression {
        Expression::unary(ExpressionType::Not, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_builds_comparison() {
        let expr = eq("country", "BG");
        assert_eq!(expr.op, ExpressionType::Eq);
        assert_eq!(*expr.left, Operand::Key(Key::new("country")));
        assert_eq!(
            expr.right.as_deref(),
            Some(&Operand::Value(FilterValue::Text("BG".to_string())))
        );
    }

    #[test]
    fn test_and_chain_matches_manual_tree() {
        let built = eq("genre", "drama").and(gte("year", 2020));
        let manual = Expression::new(
            ExpressionType::And,
            Expression::new(ExpressionType::Eq, Key::new("genre"), FilterValue::from("drama")),
            Expression::new(ExpressionType::Gte, Key::new("year"), FilterValue::from(2020)),
        );
        assert_eq!(built, manual);
    }

    #[test]
    fn test_in_list_builds_list_value() {
        let expr = in_list("genre", ["comedy", "drama"]);
        assert_eq!(expr.op, ExpressionType::In);
        match expr.right.as_deref() {
            Some(Operand::Value(FilterValue::List(items))) => assert_eq!(items.len(), 2),
            other => panic!("expected list operand, got {:?}", other),
        }
    }

    #[test]
    fn test_group_then_and() {
        let expr = group(gte("year", 2020).or(eq("country", "BG"))).and(ne("city", "Sofia"));
        assert_eq!(expr.op, ExpressionType::And);
        assert!(matches!(*expr.left, Operand::Group(_)));
    }

    #[test]
    fn test_negate_is_unary() {
        let expr = eq("country", "BG").negate();
        assert_eq!(expr.op, ExpressionType::Not);
        assert!(expr.right.is_none());
    }
}
