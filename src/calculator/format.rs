//! Result formatting for the calculator display.

use super::evaluation::Number;

/// Values above this magnitude are shown in exponential notation.
const LARGE_THRESHOLD: f64 = 1e12;

/// Nonzero values below this magnitude are shown in exponential notation.
const SMALL_THRESHOLD: f64 = 1e-6;

/// Decimal places kept in plain notation.
const DECIMAL_PLACES: usize = 12;

/// Significant digits kept in exponential notation.
const SIGNIFICANT_DIGITS: usize = 6;

/// Format a number for display.
pub fn format_number(value: &Number) -> String {
    match value {
        Number::Integer(n) => n.to_string(),
        Number::Float(x) => format_float(*x),
    }
}

/// Format a float for display.
///
/// Large and tiny magnitudes use exponential notation (`1e+13`); everything
/// else is rounded and stripped of trailing zeros (`0.5`, `4`).
pub fn format_float(value: f64) -> String {
    if needs_exponent(value) {
        let exponential = format_exponential(value);
        // Rounding may land back inside the plain range (1e+12, 1e-06).
        if exponential.parse::<f64>().map_or(true, needs_exponent) {
            return exponential;
        }
    }

    format_decimal(value)
}

fn needs_exponent(value: f64) -> bool {
    let magnitude = value.abs();
    magnitude > LARGE_THRESHOLD || (value != 0.0 && magnitude < SMALL_THRESHOLD)
}

/// Format a display string again, as if it were a fresh result.
///
/// Display strings produced by [`format_number`] are fixed points of this.
pub fn reformat(display: &str) -> Option<String> {
    if let Ok(n) = display.parse::<i128>() {
        return Some(format_number(&Number::Integer(n)));
    }

    display
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .map(format_float)
}

fn format_decimal(value: f64) -> String {
    let formatted = format!("{:.*}", DECIMAL_PLACES, value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');

    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn format_exponential(value: f64) -> String {
    let formatted = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);

    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };

    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };

    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };

    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values() {
        assert_eq!(format_float(4.0), "4");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(-2.25), "-2.25");
        assert_eq!(format_float(0.0), "0");
        assert_eq!(format_float(-0.0), "0");
        assert_eq!(format_float(1e12), "1000000000000");
        assert_eq!(format_float(0.000001), "0.000001");
    }

    #[test]
    fn test_rounding_to_twelve_places() {
        assert_eq!(format_float(1.0 / 3.0), "0.333333333333");
        assert_eq!(format_float(0.1 + 0.2), "0.3");
        assert_eq!(format_float(2.0_f64.sqrt()), "1.414213562373");
    }

    #[test]
    fn test_exponential_values() {
        assert_eq!(format_float(1e13), "1e+13");
        assert_eq!(format_float(-1e13), "-1e+13");
        assert_eq!(format_float(1e-7), "1e-07");
        assert_eq!(format_float(1.234567e-7), "1.23457e-07");
        assert_eq!(format_float(123456789012345.0), "1.23457e+14");
        assert_eq!(format_float(1e300), "1e+300");
    }

    #[test]
    fn test_rounding_at_thresholds_stays_plain() {
        assert_eq!(format_float(1_000_000_000_000.5), "1000000000000.5");
        assert_eq!(format_float(9.999996e-7), "0.000001");
        assert_eq!(format_float(-9.999996e-7), "-0.000001");
    }

    #[test]
    fn test_integers_stay_plain() {
        assert_eq!(
            format_number(&Number::Integer(2432902008176640000)),
            "2432902008176640000"
        );
        assert_eq!(format_number(&Number::Integer(-6)), "-6");
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let values = [
            Number::Float(4.0),
            Number::Float(1.0 / 3.0),
            Number::Float(1e13),
            Number::Float(1.234567e-7),
            Number::Float(-98765.4321),
            Number::Integer(2432902008176640000),
            Number::Float(1_000_000_000_000.5),
            Number::Float(9.999996e-7),
        ];

        for value in &values {
            let once = format_number(value);
            assert_eq!(reformat(&once).as_deref(), Some(once.as_str()));
        }
    }

    #[test]
    fn test_reformat_rejects_garbage() {
        assert_eq!(reformat("Syntax Error"), None);
        assert_eq!(reformat("inf"), None);
    }
}
