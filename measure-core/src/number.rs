//! Number helpers shared by the converters

use crate::error::ConvertError;
use crate::types::RoundingMode;

/// Default number of decimal digits in a result
pub const DEFAULT_PRECISION: u32 = 4;

/// Round `value` to `precision` decimal digits.
///
/// `RoundingMode::Round` rounds half away from zero. If scaling by
/// `10^precision` overflows, the value is returned unrounded.
pub fn round_to(value: f64, precision: u32, mode: RoundingMode) -> f64 {
    let exp = i32::try_from(precision).unwrap_or(i32::MAX);
    let factor = 10f64.powi(exp);
    let scaled = value * factor;
    if !factor.is_finite() || !scaled.is_finite() {
        return value;
    }

    let rounded = match mode {
        RoundingMode::Round => scaled.round(),
        RoundingMode::Ceil => scaled.ceil(),
        RoundingMode::Floor => scaled.floor(),
    } / factor;

    // No negative zero in results
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Render a number for formulas and sentences.
///
/// Magnitudes in `[1e-6, 1e21)` print as plain decimals, anything else in
/// exponent form with an explicit sign (`1e-12`, `1e+21`). Negative zero
/// prints as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() || (1e-6..1e21).contains(&value.abs()) {
        return value.to_string();
    }
    let rendered = format!("{:e}", value);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => rendered,
    }
}

/// Reject NaN and infinities before any arithmetic
pub fn ensure_finite(value: f64) -> Result<f64, ConvertError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConvertError::conversion(format!(
            "Value must be a finite number, got {}",
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0, RoundingMode::Round), 3.0);
        assert_eq!(round_to(-2.5, 0, RoundingMode::Round), -3.0);
        assert_eq!(round_to(0.12345, 4, RoundingMode::Round), 0.1235);
        assert_eq!(round_to(1000.0, 4, RoundingMode::Round), 1000.0);
    }

    #[test]
    fn test_ceil_and_floor() {
        assert_eq!(round_to(1.21, 1, RoundingMode::Ceil), 1.3);
        assert_eq!(round_to(1.29, 1, RoundingMode::Floor), 1.2);
        assert_eq!(round_to(-1.21, 1, RoundingMode::Floor), -1.3);
    }

    #[test]
    fn test_no_negative_zero() {
        let r = round_to(-0.00001, 2, RoundingMode::Round);
        assert_eq!(r, 0.0);
        assert!(r.is_sign_positive());
    }

    #[test]
    fn test_huge_precision_returns_value() {
        assert_eq!(round_to(1.5, 400, RoundingMode::Round), 1.5);
        assert_eq!(round_to(1e300, 20, RoundingMode::Round), 1e300);
    }

    #[test]
    fn test_format_number_plain_range() {
        assert_eq!(format_number(1000.0), "1000");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(-2.25), "-2.25");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
    }

    #[test]
    fn test_format_number_exponent_form() {
        assert_eq!(format_number(1e-12), "1e-12");
        assert_eq!(format_number(1.602176634e-19), "1.602176634e-19");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite(1.5), Ok(1.5));
        assert!(matches!(ensure_finite(f64::NAN), Err(ConvertError::Conversion(_))));
        assert!(ensure_finite(f64::INFINITY).is_err());
    }
}
