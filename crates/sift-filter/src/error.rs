//! Error types for filter parsing, validation, and rendering.

use thiserror::Error;

use crate::ast::ExpressionType;

/// Common result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Filter expression errors.
///
/// Every failure is immediate and synchronous; there is no recovery or
/// degraded mode. Callers fix the input and retry the call.
#[derive(Debug, Clone, Error)]
pub enum FilterError {
    /// A key referenced a field name absent from the dialect's allow-list.
    #[error("not allowed filter identifier name: {0}")]
    DisallowedIdentifier(String),

    /// `In`/`Nin` was given an empty operand set.
    #[error("IN/NOT IN requires a non-empty list of values")]
    EmptyMembershipList,

    /// A node carried an operand shape its operator cannot accept.
    #[error("malformed operand for {op:?}: {message}")]
    MalformedOperand {
        op: ExpressionType,
        message: String,
    },

    /// The dialect has no way to express the operator.
    #[error("operator {0:?} is not supported by the {1} dialect")]
    UnsupportedOperator(ExpressionType, &'static str),

    /// A date-looking string did not re-parse as a valid date.
    #[error("invalid date literal: {0}")]
    InvalidDate(String),

    /// The textual filter language failed to parse.
    #[error("filter parse error:\n{errors}")]
    Parse { errors: String },

    /// A NaN or infinite decimal has no spelling in any target syntax.
    #[error("non-finite decimal cannot be rendered")]
    NonFiniteDecimal,

    /// No dialect registered under the requested name.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),
}
