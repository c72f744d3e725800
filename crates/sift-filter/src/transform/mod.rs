//! Expression tree transforms.
//!
//! Transforms run between construction/parsing and dialect rendering:
//! validation rejects malformed or disallowed trees, and negation
//! push-down rewrites `NOT` away for dialects with no native negation.

mod negate;
mod validate;

pub use negate::{push_down_negation, NegationPushDown};
pub use validate::{check, Validate};

use crate::ast::Expression;
use crate::error::FilterResult;

/// Trait for expression tree transforms.
pub trait ExpressionTransform: Send + Sync {
    /// Unique name for this transform
    fn name(&self) -> &'static str;

    /// Apply the transform, consuming the input tree.
    fn apply(&self, expr: Expression) -> FilterResult<Expression>;
}
