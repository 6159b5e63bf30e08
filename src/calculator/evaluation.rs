//! Expression evaluation.
//!
//! Runs the whole pipeline (glyph rewriting, validation, tokenizing,
//! parsing, interpretation, formatting) and reports a [`CalcResult`].
//! Evaluation is pure: the previous result and angle mode come in as
//! arguments and nothing is written back.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{debug, trace};

use super::error::CalcError;
use super::format::format_number;
use super::functions::{AngleMode, Function};
use super::lexer::tokenize;
use super::notation::canonicalize;
use super::parser::{BinaryOp, Expr, parse};
use super::validation::validate_characters;

/// Largest n whose factorial fits in an `i128`.
const MAX_EXACT_FACTORIAL: u32 = 33;

/// Largest n whose factorial is finite as an `f64`.
const MAX_FLOAT_FACTORIAL: u32 = 170;

/// Distance from the nearest integer still accepted as an integer operand.
const INTEGER_TOLERANCE: f64 = 1e-9;

/// A computed value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// Exact integer, produced by factorial and integer-only arithmetic.
    Integer(i128),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(n) => n as f64,
            Self::Float(x) => x,
        }
    }
}

/// Result of evaluating a calculator expression.
#[derive(Clone, Debug)]
pub enum CalcResult {
    /// Successful calculation with a valid numeric result.
    Success {
        /// The original expression.
        expression: String,
        /// The numeric value.
        value: Number,
        /// Formatted for display.
        display: String,
    },
    /// The expression could not be evaluated.
    Error {
        /// The original expression.
        expression: String,
        error: CalcError,
    },
}

impl CalcResult {
    /// Get the expression that was evaluated.
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Error { expression, .. } => expression,
        }
    }

    /// Check if this is a successful result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Get the display string (result or error label).
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display, .. } => display,
            Self::Error { error, .. } => error.label(),
        }
    }

    /// Get the numeric value (only for successful results).
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Success { value, .. } => Some(value.as_f64()),
            Self::Error { .. } => None,
        }
    }

    /// Get the error (only for failed results).
    pub fn error(&self) -> Option<&CalcError> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error, .. } => Some(error),
        }
    }
}

/// Serializes as `{"ok": true, "value", "display"}` or `{"ok": false, "kind", "detail"}`.
impl Serialize for CalcResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { value, display, .. } => {
                let mut state = serializer.serialize_struct("CalcResult", 3)?;
                state.serialize_field("ok", &true)?;
                state.serialize_field("value", &value.as_f64())?;
                state.serialize_field("display", display)?;
                state.end()
            }
            Self::Error { error, .. } => {
                let mut state = serializer.serialize_struct("CalcResult", 3)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("kind", &error.kind())?;
                state.serialize_field("detail", &error.to_string())?;
                state.end()
            }
        }
    }
}

/// Evaluate a calculator expression.
///
/// `last_result` is what `Ans` refers to. Errors are reported in the result,
/// never raised.
pub fn evaluate_expression(input: &str, last_result: f64, angle_mode: AngleMode) -> CalcResult {
    let expression = input.trim().to_string();

    match compute(&expression, last_result, angle_mode) {
        Ok(value) => {
            let shown = format_number(&value);
            debug!(%expression, display = %shown, "evaluated");
            CalcResult::Success {
                expression,
                value,
                display: shown,
            }
        }
        Err(error) => {
            debug!(%expression, %error, "evaluation failed");
            CalcResult::Error { expression, error }
        }
    }
}

/// Evaluate a calculator expression to a raw number.
pub fn compute(input: &str, last_result: f64, angle_mode: AngleMode) -> Result<Number, CalcError> {
    let canonical = canonicalize(input);
    validate_characters(&canonical)?;

    let tokens = tokenize(&canonical)?;
    trace!(?tokens, "tokenized");

    let tree = parse(&tokens)?;
    trace!(?tree, "parsed");

    let context = Context {
        last_result,
        angle_mode,
    };
    let value = context.eval(&tree)?;

    match value {
        Number::Float(x) if !x.is_finite() => Err(CalcError::Overflow),
        other => Ok(other),
    }
}

struct Context {
    last_result: f64,
    angle_mode: AngleMode,
}

impl Context {
    fn eval(&self, expr: &Expr) -> Result<Number, CalcError> {
        match expr {
            Expr::Number(n) => finite(*n),
            Expr::Constant(value) => Ok(Number::Float(*value)),
            Expr::Ans => finite(self.last_result),
            Expr::Neg(inner) => Ok(match self.eval(inner)? {
                Number::Integer(n) => n
                    .checked_neg()
                    .map_or(Number::Float(-(n as f64)), Number::Integer),
                Number::Float(x) => Number::Float(-x),
            }),
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                binary(*op, lhs, rhs)
            }
            Expr::Factorial(inner) => factorial(self.eval(inner)?),
            Expr::Call(function, args) => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg).map(Number::as_f64))
                    .collect::<Result<Vec<_>, _>>()?;
                function.apply(&args, self.angle_mode).map(Number::Float)
            }
        }
    }
}

fn finite(x: f64) -> Result<Number, CalcError> {
    if x.is_finite() {
        Ok(Number::Float(x))
    } else {
        Err(CalcError::Overflow)
    }
}

fn binary(op: BinaryOp, lhs: Number, rhs: Number) -> Result<Number, CalcError> {
    if let (Number::Integer(a), Number::Integer(b)) = (lhs, rhs) {
        let exact = match op {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Sub => a.checked_sub(b),
            BinaryOp::Mul => a.checked_mul(b),
            BinaryOp::Div if a.checked_rem(b) == Some(0) => a.checked_div(b),
            _ => None,
        };
        if let Some(n) = exact {
            return Ok(Number::Integer(n));
        }
    }

    let (a, b) = (lhs.as_f64(), rhs.as_f64());

    match op {
        BinaryOp::Add => finite(a + b),
        BinaryOp::Sub => finite(a - b),
        BinaryOp::Mul => finite(a * b),
        BinaryOp::Div if b == 0.0 => Err(CalcError::DivisionByZero),
        BinaryOp::Div => finite(a / b),
        BinaryOp::Pow if a == 0.0 && b < 0.0 => Err(CalcError::DivisionByZero),
        BinaryOp::Pow => Function::Pow.apply(&[a, b], AngleMode::Rad).map(Number::Float),
    }
}

fn factorial(operand: Number) -> Result<Number, CalcError> {
    let n = match operand {
        Number::Integer(n) if n < 0 => return Err(CalcError::FactorialDomain(n as f64)),
        Number::Integer(n) => n,
        Number::Float(x) => {
            let rounded = x.round();
            if x < 0.0 || (x - rounded).abs() > INTEGER_TOLERANCE {
                return Err(CalcError::FactorialDomain(x));
            }
            // Anything this large overflows below anyway.
            rounded.min(f64::from(u32::MAX)) as i128
        }
    };

    if n <= i128::from(MAX_EXACT_FACTORIAL) {
        return Ok(Number::Integer((1..=n).product()));
    }

    if n <= i128::from(MAX_FLOAT_FACTORIAL) {
        return Ok(Number::Float((1..=n).map(|k| k as f64).product()));
    }

    Err(CalcError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> CalcResult {
        evaluate_expression(input, 0.0, AngleMode::Rad)
    }

    fn display(input: &str) -> String {
        eval(input).display().to_string()
    }

    fn error(input: &str) -> Option<CalcError> {
        eval(input).error().cloned()
    }

    #[test]
    fn test_basic_evaluation() {
        let result = eval("2 + 2");
        assert!(result.is_success());
        assert_eq!(result.display(), "4");
        assert_eq!(result.value(), Some(4.0));
        assert_eq!(result.expression(), "2 + 2");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(display("2+3*4"), "14");
        assert_eq!(display("(2+3)*4"), "20");
        assert_eq!(display("10-4-3"), "3");
        assert_eq!(display("100/10/5"), "2");
        assert_eq!(display("-2^2"), "-4");
        assert_eq!(display("2^3^2"), "512");
        assert_eq!(display("2^-1"), "0.5");
        assert_eq!(display("2**10"), "1024");
        assert_eq!(display("--3"), "3");
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(display("6×7"), "42");
        assert_eq!(display("9÷3−1"), "2");
        assert_eq!(display("2×π"), display("2*pi"));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(error("5/0"), Some(CalcError::DivisionByZero));
        assert_eq!(error("1/(2-2)"), Some(CalcError::DivisionByZero));
        assert_eq!(error("0^-1"), Some(CalcError::DivisionByZero));
        assert_eq!(display("5/0"), "Error");
    }

    #[test]
    fn test_factorial() {
        assert_eq!(display("5!"), "120");
        assert_eq!(display("(2+3)!"), "120");
        assert_eq!(display("0!"), "1");
        assert_eq!(display("3!!"), "720");
        assert_eq!(display("3!^2"), "36");
        assert_eq!(display("2^3!"), "64");
        assert_eq!(display("0-3!"), "-6");
        assert_eq!(display("20!"), "2432902008176640000");
        assert_eq!(display("5!/5"), "24");
        assert_eq!(display("(0.1*30)!"), "6");
    }

    #[test]
    fn test_factorial_errors() {
        assert!(matches!(error("-1!"), Some(CalcError::FactorialDomain(_))));
        assert!(matches!(error("2.5!"), Some(CalcError::FactorialDomain(_))));
        assert_eq!(error("!3"), Some(CalcError::FactorialSyntax));
        assert_eq!(display("!3"), "Syntax Error (Factorial)");
        assert_eq!(error("171!"), Some(CalcError::Overflow));
    }

    #[test]
    fn test_large_factorials_are_floats() {
        let result = eval("50!");
        assert!(result.is_success());
        assert_eq!(result.display(), "3.04141e+64");
        assert!(eval("170!").is_success());
    }

    #[test]
    fn test_exact_factorial_limit() {
        assert_eq!(display("33!"), "8683317618811886495518194401280000000");
        assert_eq!(display("34!"), "2.95233e+38");
        assert!(matches!(
            eval("33!"),
            CalcResult::Success { value: Number::Integer(_), .. }
        ));
        assert!(matches!(
            eval("34!"),
            CalcResult::Success { value: Number::Float(_), .. }
        ));
    }

    #[test]
    fn test_integer_arithmetic_stays_exact() {
        assert_eq!(display("25!-25!+1"), "1");
        assert_eq!(display("20!*3!"), "14597412049059840000");
    }

    #[test]
    fn test_degree_trig() {
        let deg = |input: &str| evaluate_expression(input, 0.0, AngleMode::Deg);
        assert_eq!(deg("sin(90)").display(), "1");
        assert_eq!(deg("cos(90)").display(), "0");
        assert_eq!(deg("tan(45)").display(), "1");
        assert_eq!(deg("asin(1)").display(), "90");
        assert_eq!(deg("acos(0.5)").display(), "60");
    }

    #[test]
    fn test_radian_trig() {
        assert_eq!(display("sin(pi/2)"), "1");
        assert_eq!(display("cos(pi)"), "-1");
        assert_eq!(display("sin(0)"), "0");
        assert_eq!(display("asin(1)"), display("pi/2"));
    }

    #[test]
    fn test_functions() {
        assert_eq!(display("sqrt(16)"), "4");
        assert_eq!(display("log(1000)"), "3");
        assert_eq!(display("ln(e)"), "1");
        assert_eq!(display("exp(0)"), "1");
        assert_eq!(display("pow(2, 10)"), "1024");
        assert_eq!(display("abs(-7.5)"), "7.5");
        assert_eq!(display("floor(2.7)"), "2");
        assert_eq!(display("ceil(2.1)"), "3");
        assert_eq!(display("log_b(8, 2)"), "3");
        assert_eq!(display("sqrt(3!*6)"), "6");
    }

    #[test]
    fn test_domain_errors() {
        assert_eq!(error("sqrt(-1)"), Some(CalcError::Domain("sqrt")));
        assert_eq!(error("ln(0)"), Some(CalcError::Domain("ln")));
        assert_eq!(error("(-8)^(1/3)"), Some(CalcError::Domain("pow")));
        assert_eq!(error("tan(pi/2)"), Some(CalcError::Domain("tan")));
        let deg = evaluate_expression("tan(90)", 0.0, AngleMode::Deg);
        assert_eq!(deg.error(), Some(&CalcError::Domain("tan")));
        assert_eq!(deg.display(), "Error");
    }

    #[test]
    fn test_overflow() {
        assert_eq!(error("10^400"), Some(CalcError::Overflow));
        assert_eq!(error("1e400"), Some(CalcError::Overflow));
        assert_eq!(error("exp(1000)"), Some(CalcError::Overflow));
    }

    #[test]
    fn test_ans_back_reference() {
        let result = evaluate_expression("Ans*2", 4.0, AngleMode::Rad);
        assert_eq!(result.display(), "8");
        let result = evaluate_expression("Ans!", 4.0, AngleMode::Rad);
        assert_eq!(result.display(), "24");
    }

    #[test]
    fn test_names_are_whole_tokens() {
        assert_eq!(display("e"), display("exp(1)"));
        assert_eq!(display("2e3"), "2000");
        assert!(matches!(error("Answer"), Some(CalcError::Syntax(_))));
        assert!(matches!(error("pie"), Some(CalcError::Syntax(_))));
        assert!(matches!(error("epi"), Some(CalcError::Syntax(_))));
    }

    #[test]
    fn test_arbitrary_code_rejected() {
        for input in ["import os", "__import__('os')", "os.system(1)", "open(1)", "x = 1"] {
            let result = eval(input);
            assert!(!result.is_success(), "{input} should fail");
            assert!(matches!(
                result.error(),
                Some(CalcError::Syntax(_) | CalcError::InvalidCharacter(_))
            ));
        }
        assert_eq!(error("2 $ 3"), Some(CalcError::InvalidCharacter('$')));
    }

    #[test]
    fn test_magnitude_formatting() {
        assert_eq!(display("10^13"), "1e+13");
        assert_eq!(display("0.0000001"), "1e-07");
        assert_eq!(display("2+2"), "4");
        assert_eq!(display("1/3"), "0.333333333333");
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(display(""), "Syntax Error");
        assert_eq!(display("2+"), "Syntax Error");
        assert_eq!(display("(2+3"), "Syntax Error");
        assert_eq!(display("sin"), "Syntax Error");
    }

    #[test]
    fn test_json_shape() {
        let ok = serde_json::to_value(eval("2+2")).unwrap();
        assert_eq!(ok, serde_json::json!({"ok": true, "value": 4.0, "display": "4"}));

        let err = serde_json::to_value(eval("5/0")).unwrap();
        assert_eq!(
            err,
            serde_json::json!({"ok": false, "kind": "DivisionByZero", "detail": "division by zero"})
        );
    }
}
