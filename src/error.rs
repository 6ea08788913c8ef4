use thiserror::Error;

use crate::types::MethodError;

/// Reason an expression could not be evaluated.
///
/// The `Display` output of each variant is stable; hosts may match on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("expecting expression")]
    ExpectingExpression,

    #[error("expecting identifier")]
    ExpectingIdentifier,

    #[error("expecting '.'")]
    ExpectingDot,

    #[error("expecting '('")]
    ExpectingLParen,

    #[error("expecting value")]
    ExpectingValue,

    #[error("expecting ')'")]
    ExpectingRParen,

    #[error("expecting ','")]
    ExpectingComma,

    #[error("expecting ']'")]
    ExpectingRBracket,

    #[error("variable '{0}' not found")]
    VariableNotFound(String),

    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    #[error("unterminated string")]
    UnterminatedString,

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("maximum nesting depth of {0} exceeded")]
    NestingTooDeep(usize),

    #[error(transparent)]
    Method(#[from] MethodError),
}
