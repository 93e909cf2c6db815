//! Linear conversion - every category whose units differ by a single factor

use measure_core::{
    ensure_finite, format_number, round_to, ConversionOptions, ConversionResult, ConvertError,
};

use crate::tables::UnitTable;

fn checked_factor(table: &UnitTable, unit: &str, role: &str) -> Result<f64, ConvertError> {
    let factor = table
        .factor(unit)
        .ok_or_else(|| ConvertError::invalid_unit(format!("Invalid {} unit: {}", role, unit)))?;
    if !(factor.is_finite() && factor > 0.0) {
        return Err(ConvertError::conversion(format!(
            "Invalid conversion factor for {}: {}",
            unit, factor
        )));
    }
    Ok(factor)
}

/// Convert through the table's base unit: `value * from_factor / to_factor`.
///
/// Symbols are looked up case-insensitively; the result and formula echo
/// them as given.
pub fn convert(
    value: f64,
    from_unit: &str,
    to_unit: &str,
    table: &UnitTable,
    options: &ConversionOptions,
) -> Result<ConversionResult, ConvertError> {
    let from_factor = checked_factor(table, from_unit, "source")?;
    let to_factor = checked_factor(table, to_unit, "target")?;
    let value = ensure_finite(value)?;

    let base = value * from_factor;
    let result = base / to_factor;
    let precision = options.precision();

    Ok(ConversionResult {
        from_value: value,
        from_unit: from_unit.to_string(),
        to_value: round_to(result, precision, options.rounding),
        to_unit: to_unit.to_string(),
        formula: format!(
            "({} {}) * ({}) / ({})",
            format_number(value),
            from_unit,
            format_number(from_factor),
            format_number(to_factor)
        ),
        precision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use measure_core::RoundingMode;

    fn mock_table() -> UnitTable {
        UnitTable::from_factors([("a", 1.0), ("b", 2.0), ("c", 0.5)])
    }

    #[test]
    fn test_convert_with_formula() {
        let result = convert(10.0, "a", "b", &mock_table(), &ConversionOptions::default()).unwrap();
        assert_eq!(result.to_value, 5.0);
        assert_eq!(result.formula, "(10 a) * (1) / (2)");
        assert_eq!(result.precision, 4);
    }

    #[test]
    fn test_formula_uses_exponent_form_for_extreme_factors() {
        let table = UnitTable::from_factors([("m", 1.0), ("pm", 1e-12), ("zm", 1e21)]);
        let options = ConversionOptions::default();

        let result = convert(1.0, "pm", "m", &table, &options).unwrap();
        assert_eq!(result.formula, "(1 pm) * (1e-12) / (1)");
        assert_eq!(result.to_value, 0.0);

        let result = convert(2.0, "zm", "m", &table, &options).unwrap();
        assert_eq!(result.formula, "(2 zm) * (1e+21) / (1)");
    }

    #[test]
    fn test_respects_precision() {
        let options = ConversionOptions::new().with_precision(2);
        let result = convert(10.0, "a", "c", &mock_table(), &options).unwrap();
        assert_eq!(result.to_value, 20.00);
        assert_eq!(result.precision, 2);
    }

    #[test]
    fn test_rounding_modes() {
        let table = UnitTable::from_factors([("x", 1.0), ("y", 3.0)]);
        let convert_with = |mode| {
            let options = ConversionOptions::new().with_precision(2).with_rounding(mode);
            convert(2.0, "x", "y", &table, &options).unwrap().to_value
        };
        assert_eq!(convert_with(RoundingMode::Round), 0.67);
        assert_eq!(convert_with(RoundingMode::Floor), 0.66);
        assert_eq!(convert_with(RoundingMode::Ceil), 0.67);
    }

    #[test]
    fn test_invalid_units() {
        let err = convert(10.0, "a", "invalid", &mock_table(), &ConversionOptions::default()).unwrap_err();
        assert_eq!(err, ConvertError::invalid_unit("Invalid target unit: invalid"));

        let err = convert(10.0, "zz", "a", &mock_table(), &ConversionOptions::default()).unwrap_err();
        assert_eq!(err, ConvertError::invalid_unit("Invalid source unit: zz"));
    }

    #[test]
    fn test_keeps_caller_spelling() {
        let result = convert(3.0, "A", "B", &mock_table(), &ConversionOptions::default()).unwrap();
        assert_eq!(result.from_unit, "A");
        assert_eq!(result.to_unit, "B");
        assert_eq!(result.formula, "(3 A) * (1) / (2)");
        assert_eq!(result.to_value, 1.5);
    }

    #[test]
    fn test_bad_factor_is_conversion_error() {
        let table = UnitTable::from_factors([("a", 1.0), ("zero", 0.0)]);
        let err = convert(1.0, "a", "zero", &table, &ConversionOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Conversion(_)));
    }

    #[test]
    fn test_non_finite_value() {
        let err = convert(f64::INFINITY, "a", "b", &mock_table(), &ConversionOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Conversion(_)));
    }
}
