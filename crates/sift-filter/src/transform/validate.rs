//! Structural and allow-list validation.
//!
//! The only semantic validation the engine performs: key identifiers must
//! appear in the schema's allow-list when one is configured, membership
//! operand sets must be non-empty lists, and every operator must carry the
//! operand shapes it can accept. Anything else is the target system's
//! concern.

use crate::ast::{Expression, ExpressionType, FilterValue, Operand};
use crate::error::{FilterError, FilterResult};
use crate::schema::FilterSchema;
use crate::transform::ExpressionTransform;

/// Validation transform over a whole expression tree.
#[derive(Debug, Clone, Default)]
pub struct Validate {
    schema: Option<FilterSchema>,
}

impl Validate {
    /// Structural validation only, no allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Structural validation plus allow-list enforcement.
    pub fn with_schema(schema: FilterSchema) -> Self {
        Self {
            schema: Some(schema),
        }
    }
}

impl ExpressionTransform for Validate {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn apply(&self, expr: Expression) -> FilterResult<Expression> {
        check(&expr, self.schema.as_ref())?;
        Ok(expr)
    }
}

/// Walk the tree and verify every node, without consuming it.
pub fn check(expr: &Expression, schema: Option<&FilterSchema>) -> FilterResult<()> {
    match expr.op {
        ExpressionType::Not => {
            if expr.right.is_some() {
                return Err(FilterError::MalformedOperand {
                    op: expr.op,
                    message: "NOT takes a single operand".to_string(),
                });
            }
            check_logical_operand(expr.op, &expr.left, schema)
        }
        ExpressionType::And | ExpressionType::Or => {
            check_logical_operand(expr.op, &expr.left, schema)?;
            match &expr.right {
                Some(right) => check_logical_operand(expr.op, right, schema),
                None => Err(FilterError::MalformedOperand {
                    op: expr.op,
                    message: "missing right operand".to_string(),
                }),
            }
        }
        ExpressionType::In | ExpressionType::Nin => {
            check_key(&expr.left, expr.op, schema)?;
            match expr.right.as_deref() {
                Some(Operand::Value(FilterValue::List(items))) => {
                    if items.is_empty() {
                        Err(FilterError::EmptyMembershipList)
                    } else {
                        Ok(())
                    }
                }
                _ => Err(FilterError::MalformedOperand {
                    op: expr.op,
                    message: "membership operand must be a list of values".to_string(),
                }),
            }
        }
        _ => {
            check_key(&expr.left, expr.op, schema)?;
            match expr.right.as_deref() {
                Some(Operand::Value(FilterValue::List(_))) => Err(FilterError::MalformedOperand {
                    op: expr.op,
                    message: "comparison operand must be a scalar value".to_string(),
                }),
                Some(Operand::Value(_)) => Ok(()),
                _ => Err(FilterError::MalformedOperand {
                    op: expr.op,
                    message: "comparison requires a literal right operand".to_string(),
                }),
            }
        }
    }
}

fn check_logical_operand(
    op: ExpressionType,
    operand: &Operand,
    schema: Option<&FilterSchema>,
) -> FilterResult<()> {
    match operand {
        Operand::Expression(inner) => check(inner, schema),
        Operand::Group(group) => check(&group.content, schema),
        _ => Err(FilterError::MalformedOperand {
            op,
            message: "logical operand must be an expression or group".to_string(),
        }),
    }
}

fn check_key(
    operand: &Operand,
    op: ExpressionType,
    schema: Option<&FilterSchema>,
) -> FilterResult<()> {
    match operand {
        Operand::Key(key) => {
            if let Some(schema) = schema {
                schema.require(key.unquoted())?;
            }
            Ok(())
        }
        _ => Err(FilterError::MalformedOperand {
            op,
            message: "left operand must be a field identifier".to_string(),
        }),
    }
}
