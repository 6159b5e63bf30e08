//! Button presses.

use std::str::FromStr;

use crate::calculator::AngleMode;

/// A single button press, parsed from the label the UI shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// `AC`: reset everything.
    Clear,
    /// `DEL`: remove the last character.
    Delete,
    /// `=`: evaluate.
    Equals,
    /// `Ans`: insert the previous result.
    Ans,
    /// `M+`: add the previous result to memory.
    MemoryAdd,
    /// `MR`: insert the memory value.
    MemoryRecall,
    /// `SHIFT`: next trig function is the inverse.
    Shift,
    /// `DEG` / `RAD`
    SetAngle(AngleMode),
    /// `DRG`: switch between degrees and radians.
    ToggleAngle,
    /// Anything else is text appended to the expression.
    Insert(String),
}

impl FromStr for Key {
    type Err = String;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim();

        Ok(match label {
            "" => return Err("empty key label".to_string()),
            "AC" => Self::Clear,
            "DEL" | "⌫" => Self::Delete,
            "=" => Self::Equals,
            "Ans" => Self::Ans,
            "M+" => Self::MemoryAdd,
            "MR" => Self::MemoryRecall,
            "SHIFT" | "2nd" => Self::Shift,
            "DEG" => Self::SetAngle(AngleMode::Deg),
            "RAD" => Self::SetAngle(AngleMode::Rad),
            "DRG" => Self::ToggleAngle,
            other => Self::Insert(other.to_string()),
        })
    }
}

impl Key {
    /// Whether this key is a command rather than expression text.
    pub fn is_command(&self) -> bool {
        !matches!(self, Self::Insert(_))
    }
}

/// The inverse form a function label takes while shift is active.
pub fn shifted_label(label: &str) -> Option<&'static str> {
    match label {
        "sin(" => Some("asin("),
        "cos(" => Some("acos("),
        "tan(" => Some("atan("),
        _ => None,
    }
}
