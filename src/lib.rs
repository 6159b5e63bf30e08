//! Scientific calculator core.
//!
//! [`calculator::evaluate_expression`] turns calculator notation into a
//! formatted result or a typed error. [`session::Session`] holds the state a
//! calculator UI keeps between button presses.

pub mod calculator;
pub mod config;
pub mod session;
