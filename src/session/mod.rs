//! Calculator session state.
//!
//! The evaluator is a pure function. This module owns everything it must not
//! touch: the expression buffer, last result, memory and mode flags. Each
//! button press is one [`Session::press`] call.

mod key;

pub use key::{Key, shifted_label};

use tracing::debug;

use crate::calculator::{ANS, AngleMode, CalcResult, evaluate_expression, is_operator_label};

/// Whether the display shows typed input or the latest outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Accumulating an expression.
    #[default]
    Entry,
    /// Showing the most recent evaluation outcome.
    Result,
}

/// Everything the calculator remembers between presses.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculatorState {
    pub expression: String,
    pub display: String,
    pub last_result: f64,
    pub memory: f64,
    pub mode: Mode,
    pub angle_mode: AngleMode,
    pub shift: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            expression: String::new(),
            display: "0".to_string(),
            last_result: 0.0,
            memory: 0.0,
            mode: Mode::Entry,
            angle_mode: AngleMode::default(),
            shift: false,
        }
    }
}

/// A calculator session driven by key presses.
#[derive(Clone, Debug, Default)]
pub struct Session {
    state: CalculatorState,
    /// Whether the result being shown is a number (not an error label).
    showing_value: bool,
    /// Whether `Ans`/`MR` tokens were pressed since the last result.
    staged: bool,
}

impl Session {
    pub fn new(angle_mode: AngleMode) -> Self {
        Self {
            state: CalculatorState {
                angle_mode,
                ..CalculatorState::default()
            },
            showing_value: false,
            staged: false,
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Apply one key press.
    ///
    /// Returns the evaluation outcome when the key triggered one.
    pub fn press(&mut self, key: Key) -> Option<CalcResult> {
        debug!(?key, mode = ?self.state.mode, "key pressed");

        match key {
            Key::Clear => self.clear(),
            Key::Delete => self.delete(),
            Key::Equals => return self.equals(),
            Key::Ans => self.recall(ANS),
            Key::MemoryAdd => {
                self.state.memory += self.state.last_result;
            }
            Key::MemoryRecall => {
                let token = recall_token(self.state.memory);
                self.recall(&token);
            }
            Key::Shift => self.state.shift = !self.state.shift,
            Key::SetAngle(mode) => self.state.angle_mode = mode,
            Key::ToggleAngle => self.state.angle_mode = self.state.angle_mode.toggled(),
            Key::Insert(label) => self.insert(&label),
        }

        None
    }

    fn clear(&mut self) {
        self.state = CalculatorState {
            angle_mode: self.state.angle_mode,
            ..CalculatorState::default()
        };
        self.showing_value = false;
        self.staged = false;
    }

    fn delete(&mut self) {
        match self.state.mode {
            Mode::Entry => {
                self.state.expression.pop();
            }
            Mode::Result => {
                self.state.expression.clear();
                self.state.mode = Mode::Entry;
                self.staged = false;
            }
        }
        self.refresh_display();
    }

    /// Append an `Ans` or memory token. In Result mode the token starts a
    /// staged expression and the mode is left alone.
    fn recall(&mut self, token: &str) {
        if self.state.mode == Mode::Result && !self.staged {
            self.state.expression.clear();
            self.staged = true;
        }

        self.state.expression.push_str(token);
        self.refresh_display();
    }

    fn insert(&mut self, label: &str) {
        let label = match shifted_label(label) {
            Some(inverse) if self.state.shift => {
                self.state.shift = false;
                inverse
            }
            _ => label,
        };

        if self.state.mode == Mode::Result {
            if !self.staged {
                self.state.expression.clear();
                // Operators continue from the value on screen.
                if self.showing_value && is_operator_label(label) {
                    self.state.expression.push_str(ANS);
                }
            }
            self.state.mode = Mode::Entry;
            self.staged = false;
        }

        self.state.expression.push_str(label);
        self.refresh_display();
    }

    fn equals(&mut self) -> Option<CalcResult> {
        let ready = self.state.mode == Mode::Entry || self.staged;
        if !ready || self.state.expression.trim().is_empty() {
            return None;
        }
        self.staged = false;

        let result = evaluate_expression(
            &self.state.expression,
            self.state.last_result,
            self.state.angle_mode,
        );

        // Errors leave memory and last_result alone.
        if let Some(value) = result.value() {
            self.state.last_result = value;
        }
        self.showing_value = result.is_success();
        self.state.display = result.display().to_string();
        self.state.mode = Mode::Result;

        Some(result)
    }

    fn refresh_display(&mut self) {
        self.state.display = if self.state.expression.is_empty() {
            "0".to_string()
        } else {
            self.state.expression.clone()
        };
    }
}

/// Text inserted by `MR`: the shortest decimal that parses back to `memory`.
/// Negative values are parenthesized so they survive being appended after an
/// operator.
fn recall_token(memory: f64) -> String {
    if memory == 0.0 {
        "0".to_string()
    } else if memory < 0.0 {
        format!("({memory})")
    } else {
        memory.to_string()
    }
}
