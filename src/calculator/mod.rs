//! Calculator module for evaluating calculator-notation expressions.
//!
//! This module provides functionality to:
//! - Rewrite calculator glyphs and validate the result
//! - Tokenize, parse and evaluate against a fixed function/constant table
//! - Format results for display
//! - Copy results to the clipboard

mod clipboard;
mod error;
mod evaluation;
mod format;
mod functions;
mod lexer;
mod notation;
mod parser;
mod validation;

pub use clipboard::{ClipboardError, copy_result};
pub use error::{CalcError, ErrorKind};
pub use evaluation::{CalcResult, Number, compute, evaluate_expression};
pub use format::{format_float, format_number, reformat};
pub use functions::{AngleMode, Function};
pub use notation::is_operator_label;
pub use parser::ANS;
