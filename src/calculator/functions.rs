//! The fixed function and constant namespace.
//!
//! Nothing outside these tables can be reached from an expression.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CalcError;

/// Trig results smaller than this are reported as exactly zero.
const TRIG_EPSILON: f64 = 1e-15;

/// How trigonometric arguments and inverse results are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[serde(alias = "degrees")]
    Deg,
    #[default]
    #[serde(alias = "radians")]
    Rad,
}

impl AngleMode {
    /// The other mode (the `DRG` key).
    pub fn toggled(self) -> Self {
        match self {
            Self::Deg => Self::Rad,
            Self::Rad => Self::Deg,
        }
    }

    fn to_radians(self, x: f64) -> f64 {
        match self {
            Self::Deg => x.to_radians(),
            Self::Rad => x,
        }
    }

    fn from_radians(self, x: f64) -> f64 {
        match self {
            Self::Deg => x.to_degrees(),
            Self::Rad => x,
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deg => write!(f, "deg"),
            Self::Rad => write!(f, "rad"),
        }
    }
}

impl FromStr for AngleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deg" | "degrees" => Ok(Self::Deg),
            "rad" | "radians" => Ok(Self::Rad),
            other => Err(format!("unknown angle mode '{other}' (expected deg or rad)")),
        }
    }
}

/// Resolve a named constant.
pub fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}

/// A callable entry of the namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Exp,
    Log,
    Ln,
    LogBase,
    Pow,
    Abs,
    Floor,
    Ceil,
}

/// All callable names, in lookup order.
const FUNCTIONS: &[(&str, Function)] = &[
    ("sin", Function::Sin),
    ("cos", Function::Cos),
    ("tan", Function::Tan),
    ("asin", Function::Asin),
    ("acos", Function::Acos),
    ("atan", Function::Atan),
    ("sqrt", Function::Sqrt),
    ("exp", Function::Exp),
    ("log", Function::Log),
    ("ln", Function::Ln),
    ("log_b", Function::LogBase),
    ("pow", Function::Pow),
    ("abs", Function::Abs),
    ("floor", Function::Floor),
    ("ceil", Function::Ceil),
];

impl Function {
    /// Look up a function by its user-facing name.
    pub fn lookup(name: &str) -> Option<Self> {
        FUNCTIONS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, function)| *function)
    }

    pub fn name(self) -> &'static str {
        FUNCTIONS
            .iter()
            .find(|(_, function)| *function == self)
            .map_or("?", |(name, _)| name)
    }

    pub fn arity(self) -> usize {
        match self {
            Self::LogBase | Self::Pow => 2,
            _ => 1,
        }
    }

    /// Apply the function to already evaluated arguments.
    ///
    /// `args.len()` must equal [`Function::arity`]; the parser enforces this.
    pub fn apply(self, args: &[f64], mode: AngleMode) -> Result<f64, CalcError> {
        let x = args.first().copied().unwrap_or(f64::NAN);
        let y = args.get(1).copied().unwrap_or(f64::NAN);

        let value = match self {
            Self::Sin => snap(mode.to_radians(x).sin()),
            Self::Cos => snap(mode.to_radians(x).cos()),
            Self::Tan => {
                let radians = mode.to_radians(x);
                // Odd multiples of a right angle have no tangent.
                if radians.cos().abs() < TRIG_EPSILON {
                    return Err(CalcError::Domain(self.name()));
                }
                snap(radians.tan())
            }
            Self::Asin => mode.from_radians(x.asin()),
            Self::Acos => mode.from_radians(x.acos()),
            Self::Atan => mode.from_radians(x.atan()),
            Self::Sqrt => x.sqrt(),
            Self::Exp => x.exp(),
            Self::Log => positive(self, x)?.log10(),
            Self::Ln => positive(self, x)?.ln(),
            Self::LogBase => {
                let base = positive(self, y)?;
                if base == 1.0 {
                    return Err(CalcError::Domain(self.name()));
                }
                positive(self, x)?.ln() / base.ln()
            }
            Self::Pow => x.powf(y),
            Self::Abs => x.abs(),
            Self::Floor => x.floor(),
            Self::Ceil => x.ceil(),
        };

        if value.is_nan() {
            Err(CalcError::Domain(self.name()))
        } else if value.is_infinite() {
            Err(CalcError::Overflow)
        } else {
            Ok(value)
        }
    }
}

/// Logarithms are only defined for strictly positive arguments.
fn positive(function: Function, x: f64) -> Result<f64, CalcError> {
    if x > 0.0 {
        Ok(x)
    } else {
        Err(CalcError::Domain(function.name()))
    }
}

fn snap(x: f64) -> f64 {
    if x.abs() < TRIG_EPSILON { 0.0 } else { x }
}
