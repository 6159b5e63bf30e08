//! Tokenizer for canonical calculator expressions.

use std::fmt;

use super::error::CalcError;

/// A single token of a canonical expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// Number literal, optionally with a fraction and exponent.
    Number(f64),
    /// Maximal run of letters, digits and underscores starting with a letter.
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    /// `^` or `**`
    Caret,
    Bang,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Ident(name) => write!(f, "{name}"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Caret => write!(f, "^"),
            Self::Bang => write!(f, "!"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Comma => write!(f, ","),
        }
    }
}

/// Split a canonical expression into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let (number, next) = scan_number(&chars, i)?;
            tokens.push(Token::Number(number));
            i = next;
            continue;
        }

        if c.is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
            continue;
        }

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                Token::Caret
            }
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '!' => Token::Bang,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            other => return Err(CalcError::InvalidCharacter(other)),
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

/// Scan a number literal starting at `start`, returning it and the index after it.
///
/// An exponent is only part of the literal when `e`/`E` is followed by digits,
/// optionally signed. Otherwise the letter starts an identifier.
fn scan_number(chars: &[char], start: usize) -> Result<(f64, usize), CalcError> {
    let mut i = start;
    let mut seen_dot = false;
    let mut seen_digit = false;

    while i < chars.len() {
        match chars[i] {
            d if d.is_ascii_digit() => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            '.' => return Err(CalcError::syntax("malformed number")),
            _ => break,
        }
        i += 1;
    }

    if !seen_digit {
        return Err(CalcError::syntax("malformed number"));
    }

    if matches!(chars.get(i), Some('e' | 'E')) {
        let mut j = i + 1;
        if matches!(chars.get(j), Some('+' | '-')) {
            j += 1;
        }
        if chars.get(j).is_some_and(|c| c.is_ascii_digit()) {
            while chars.get(j).is_some_and(|c| c.is_ascii_digit()) {
                j += 1;
            }
            i = j;
        }
    }

    let literal: String = chars[start..i].iter().collect();
    let number = literal
        .parse::<f64>()
        .map_err(|_| CalcError::syntax(format!("malformed number '{literal}'")))?;

    Ok((number, i))
}
