//! Error taxonomy for calculator evaluation.

use serde::Serialize;
use thiserror::Error;

/// Everything that can go wrong while evaluating an expression.
///
/// None of these are fatal: the caller shows [`CalcError::label`] and keeps
/// its memory and last result as they were.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("factorial has no operand")]
    FactorialSyntax,

    #[error("factorial needs a non-negative integer, got {0}")]
    FactorialDomain(f64),

    #[error("result is too large")]
    Overflow,

    #[error("math domain error in {0}()")]
    Domain(&'static str),
}

/// Tag-only view of [`CalcError`], used in serialized results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    DivisionByZero,
    SyntaxError,
    InvalidCharacter,
    FactorialSyntaxError,
    FactorialDomainError,
    Overflow,
    DomainError,
}

impl CalcError {
    pub fn syntax(detail: impl Into<String>) -> Self {
        Self::Syntax(detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DivisionByZero => ErrorKind::DivisionByZero,
            Self::Syntax(_) => ErrorKind::SyntaxError,
            Self::InvalidCharacter(_) => ErrorKind::InvalidCharacter,
            Self::FactorialSyntax => ErrorKind::FactorialSyntaxError,
            Self::FactorialDomain(_) => ErrorKind::FactorialDomainError,
            Self::Overflow => ErrorKind::Overflow,
            Self::Domain(_) => ErrorKind::DomainError,
        }
    }

    /// Short label for the calculator display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Syntax(_) | Self::InvalidCharacter(_) => "Syntax Error",
            Self::FactorialSyntax => "Syntax Error (Factorial)",
            Self::DivisionByZero | Self::FactorialDomain(_) | Self::Overflow | Self::Domain(_) => {
                "Error"
            }
        }
    }
}
