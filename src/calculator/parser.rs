//! Recursive-descent parser producing an expression tree.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := postfix ('^' unary)?
//! postfix := primary '!'*
//! primary := number | constant | 'Ans' | function '(' args ')' | '(' sum ')'
//! ```
//!
//! `^` recurses through `unary`, which makes it right-associative and lets
//! the exponent carry a sign (`2^-1`).

use super::error::CalcError;
use super::functions::{Function, constant};
use super::lexer::Token;

/// The identifier that refers to the previous result.
pub const ANS: &str = "Ans";

/// Longest token stream accepted.
const MAX_TOKENS: usize = 1024;

/// Deepest nesting of parentheses and unary signs accepted.
const MAX_DEPTH: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// A parsed expression. Names are already resolved against the namespace.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Constant(f64),
    Ans,
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Factorial(Box<Expr>),
    Call(Function, Vec<Expr>),
}

/// Parse a token stream into an expression tree.
pub fn parse(tokens: &[Token]) -> Result<Expr, CalcError> {
    if tokens.is_empty() {
        return Err(CalcError::syntax("empty expression"));
    }
    if tokens.len() > MAX_TOKENS {
        return Err(CalcError::syntax("expression is too long"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_sum()?;

    match parser.peek() {
        None => Ok(expr),
        Some(Token::RParen) => Err(CalcError::syntax("unmatched ')'")),
        Some(token) => Err(CalcError::syntax(format!("unexpected '{token}'"))),
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn descend(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(CalcError::syntax("expression is nested too deeply"))
        } else {
            Ok(())
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.parse_product()?;

        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_product()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_product(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.parse_unary()?;

        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, CalcError> {
        let negate = match self.peek() {
            Some(Token::Minus) => true,
            Some(Token::Plus) => false,
            _ => return self.parse_power(),
        };
        self.pos += 1;

        self.descend()?;
        let operand = self.parse_unary()?;
        self.depth -= 1;

        if !negate {
            return Ok(operand);
        }

        // A sign written directly before a factorial operand belongs to it: -1! is (-1)!
        Ok(match operand {
            Expr::Factorial(inner) => Expr::Factorial(Box::new(Expr::Neg(inner))),
            other => Expr::Neg(Box::new(other)),
        })
    }

    fn parse_power(&mut self) -> Result<Expr, CalcError> {
        let base = self.parse_postfix()?;

        if self.eat(&Token::Caret) {
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary(
                BinaryOp::Pow,
                Box::new(base),
                Box::new(exponent),
            ));
        }

        Ok(base)
    }

    fn parse_postfix(&mut self) -> Result<Expr, CalcError> {
        let mut operand = self.parse_primary()?;

        while self.eat(&Token::Bang) {
            operand = Expr::Factorial(Box::new(operand));
        }

        Ok(operand)
    }

    fn parse_primary(&mut self) -> Result<Expr, CalcError> {
        let token = match self.advance() {
            Some(token) => token.clone(),
            None => return Err(CalcError::syntax("unexpected end of expression")),
        };

        match token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Ident(name) => self.parse_identifier(&name),
            Token::LParen => {
                self.descend()?;
                let inner = self.parse_sum()?;
                self.depth -= 1;
                if self.eat(&Token::RParen) {
                    Ok(inner)
                } else {
                    Err(CalcError::syntax("missing ')'"))
                }
            }
            Token::Bang => Err(CalcError::FactorialSyntax),
            other => Err(CalcError::syntax(format!("unexpected '{other}'"))),
        }
    }

    fn parse_identifier(&mut self, name: &str) -> Result<Expr, CalcError> {
        if name == ANS {
            return Ok(Expr::Ans);
        }

        if let Some(function) = Function::lookup(name) {
            return self.parse_call(function);
        }

        match constant(name) {
            Some(value) => Ok(Expr::Constant(value)),
            None => Err(CalcError::syntax(format!("unknown name '{name}'"))),
        }
    }

    fn parse_call(&mut self, function: Function) -> Result<Expr, CalcError> {
        match self.peek() {
            Some(Token::LParen) => self.pos += 1,
            Some(Token::Bang) => return Err(CalcError::FactorialSyntax),
            _ => {
                return Err(CalcError::syntax(format!(
                    "{}() needs parentheses",
                    function.name()
                )));
            }
        }

        self.descend()?;
        let mut args = vec![self.parse_sum()?];
        while self.eat(&Token::Comma) {
            args.push(self.parse_sum()?);
        }
        self.depth -= 1;

        if !self.eat(&Token::RParen) {
            return Err(CalcError::syntax("missing ')'"));
        }

        if args.len() != function.arity() {
            return Err(CalcError::syntax(format!(
                "{}() takes {} argument(s), got {}",
                function.name(),
                function.arity(),
                args.len()
            )));
        }

        Ok(Expr::Call(function, args))
    }
}
