//! Character allow-list for rewritten expressions.
//!
//! The grammar alone decides what evaluates. This pass only rejects stray
//! characters early so the error can name the offending one.

use lazy_static::lazy_static;
use regex::Regex;

use super::error::CalcError;

lazy_static! {
    /// Matches strings containing only math-safe characters.
    /// Allows: digits, ASCII letters, whitespace, operators, parentheses, dots, commas, underscores.
    static ref MATH_SAFE_CHARS: Regex = Regex::new(
        r"^[0-9A-Za-z\s\.\,\+\-\*/\^!()_]*$"
    ).unwrap();
}

/// Validate that every character of a rewritten expression is allowed.
pub fn validate_characters(input: &str) -> Result<(), CalcError> {
    // Reserved for implementation internals.
    if input.contains("__") {
        return Err(CalcError::InvalidCharacter('_'));
    }

    if MATH_SAFE_CHARS.is_match(input) {
        return Ok(());
    }

    match input.chars().find(|&c| !is_allowed(c)) {
        Some(c) => Err(CalcError::InvalidCharacter(c)),
        None => Ok(()),
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || "+-*/^!().,_".contains(c)
}
