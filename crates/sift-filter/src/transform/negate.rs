//! Negation push-down.
//!
//! Rewrites `NOT` nodes away by pushing negation toward the leaves:
//! De Morgan over `AND`/`OR`, operator inversion for comparisons
//! (`EQ`⇄`NE`, `LT`⇄`GTE`, `LTE`⇄`GT`), and `IN`⇄`NIN`. Dialects with no
//! native negation token run this transform before rendering; the result
//! contains no `NOT` nodes for any well-formed input.
//!
//! De Morgan rewrites wrap their result in a group, since the flipped
//! connective can have a different precedence than the original.

use crate::ast::{Expression, ExpressionType, Group, Operand};
use crate::error::FilterResult;
use crate::transform::ExpressionTransform;

/// Negation push-down transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegationPushDown;

impl ExpressionTransform for NegationPushDown {
    fn name(&self) -> &'static str {
        "negation-push-down"
    }

    fn apply(&self, expr: Expression) -> FilterResult<Expression> {
        Ok(push_down_negation(expr))
    }
}

/// Rewrite all `NOT` nodes in the tree. Pure and infallible; malformed
/// shapes (a `NOT` applied directly to a key or literal) are left intact
/// for validation to reject.
pub fn push_down_negation(expr: Expression) -> Expression {
    match expr.op {
        ExpressionType::Not => match negate_operand(*expr.left) {
            Operand::Expression(inner) => *inner,
            // Top-level parentheses carry no meaning
            Operand::Group(group) => group.content,
            leaf => Expression::unary(ExpressionType::Not, leaf),
        },
        op => Expression {
            op,
            left: Box::new(push_down_operand(*expr.left)),
            right: expr.right.map(|r| Box::new(push_down_operand(*r))),
        },
    }
}

fn push_down_operand(operand: Operand) -> Operand {
    match operand {
        Operand::Expression(inner) => match inner.op {
            ExpressionType::Not => negate_operand(*inner.left),
            _ => Operand::from(push_down_negation(*inner)),
        },
        Operand::Group(group) => grouped(push_down_negation(group.content)),
        leaf => leaf,
    }
}

fn negate_operand(operand: Operand) -> Operand {
    match operand {
        Operand::Expression(inner) => negate_expression(*inner),
        Operand::Group(group) => match negate_expression(group.content) {
            Operand::Group(negated) => Operand::Group(negated),
            Operand::Expression(negated) => grouped(*negated),
            leaf => leaf,
        },
        leaf => Operand::from(Expression::unary(ExpressionType::Not, leaf)),
    }
}

fn negate_expression(expr: Expression) -> Operand {
    match expr.op {
        ExpressionType::And => grouped(rebuild_negated(ExpressionType::Or, expr)),
        ExpressionType::Or => grouped(rebuild_negated(ExpressionType::And, expr)),
        // Double negation cancels
        ExpressionType::Not => push_down_operand(*expr.left),
        op => match op.inverse() {
            Some(inverse) => Operand::from(Expression {
                op: inverse,
                left: expr.left,
                right: expr.right,
            }),
            None => Operand::from(expr),
        },
    }
}

fn rebuild_negated(op: ExpressionType, expr: Expression) -> Expression {
    Expression {
        op,
        left: Box::new(negate_operand(*expr.left)),
        right: expr
            .right
            .map(|r| Box::new(negate_operand(*r))),
    }
}

fn grouped(inner: Expression) -> Operand {
    Operand::Group(Box::new(Group::new(inner)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{eq, group, gte, in_list, lt, ne, nin_list};

    #[test]
    fn test_not_eq_becomes_ne() {
        let expr = eq("country", "BG").negate();
        assert_eq!(push_down_negation(expr), ne("country", "BG"));
    }

    #[test]
    fn test_not_lt_becomes_gte() {
        let expr = lt("year", 2020).negate();
        assert_eq!(push_down_negation(expr), gte("year", 2020));
    }

    #[test]
    fn test_not_in_becomes_nin() {
        let expr = in_list("city", ["Sofia"]).negate();
        assert_eq!(push_down_negation(expr), nin_list("city", ["Sofia"]));
    }

    #[test]
    fn test_double_negation_cancels() {
        let expr = eq("country", "BG").negate().negate();
        assert_eq!(push_down_negation(expr), eq("country", "BG"));
    }

    #[test]
    fn test_de_morgan_over_and() {
        // not (a == 1 && b == 2)  =>  a != 1 || b != 2
        let expr = eq("a", 1).and(eq("b", 2)).negate();
        let expected = ne("a", 1).or(ne("b", 2));
        assert_eq!(push_down_negation(expr), expected);
    }

    #[test]
    fn test_de_morgan_keeps_group_below_root() {
        // x == 1 && not (a == 1 || b == 2)  =>  x == 1 && (a != 1 && b != 2)
        let expr = eq("x", 1).and(eq("a", 1).or(eq("b", 2)).negate());
        let expected = eq("x", 1).and(group(ne("a", 1).and(ne("b", 2))));
        assert_eq!(push_down_negation(expr), expected);
    }

    #[test]
    fn test_not_grouped_or() {
        // not (a == 1 || b == 2)  =>  a != 1 && b != 2 at the root
        let expr = group(eq("a", 1).or(eq("b", 2)))
            .and(eq("c", 3))
            .negate();
        // not ((a || b) && c) => (not(a || b)) || c != 3 => ((a != 1 && b != 2)) || c != 3
        let result = push_down_negation(expr);
        assert_eq!(result.op, ExpressionType::Or);
    }

    #[test]
    fn test_tree_without_not_is_unchanged() {
        let expr = group(gte("year", 2020).or(eq("country", "BG"))).and(eq("city", "Sofia"));
        assert_eq!(push_down_negation(expr.clone()), expr);
    }
}
