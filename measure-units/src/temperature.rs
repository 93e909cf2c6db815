//! Temperature conversion
//!
//! Celsius, Fahrenheit and Kelvin relate by an affine transform
//! (`y = a·x + b`), so they get their own converter instead of a factor table.

use measure_core::{
    ensure_finite, round_to, ConversionOptions, ConversionResult, ConvertError, UnitSystem,
    ValidationResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub const ALL: [TemperatureUnit; 3] = [
        TemperatureUnit::Celsius,
        TemperatureUnit::Fahrenheit,
        TemperatureUnit::Kelvin,
    ];

    /// Case-insensitive parse of `c`, `f` or `k`
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol.to_lowercase().as_str() {
            "c" => Some(TemperatureUnit::Celsius),
            "f" => Some(TemperatureUnit::Fahrenheit),
            "k" => Some(TemperatureUnit::Kelvin),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "c",
            TemperatureUnit::Fahrenheit => "f",
            TemperatureUnit::Kelvin => "k",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "degree Celsius",
            TemperatureUnit::Fahrenheit => "degree Fahrenheit",
            TemperatureUnit::Kelvin => "kelvin",
        }
    }

    pub fn system(&self) -> UnitSystem {
        match self {
            TemperatureUnit::Fahrenheit => UnitSystem::Imperial,
            TemperatureUnit::Celsius | TemperatureUnit::Kelvin => UnitSystem::Metric,
        }
    }
}

pub fn is_temperature_unit(symbol: &str) -> bool {
    TemperatureUnit::parse(symbol).is_some()
}

/// Label used for pairs without a dedicated formula
pub const DIRECT_CONVERSION: &str = "Direct conversion";

const FORMULAS: [((TemperatureUnit, TemperatureUnit), &str); 6] = {
    use TemperatureUnit::*;
    [
        ((Celsius, Fahrenheit), "(°C × 9/5) + 32"),
        ((Celsius, Kelvin), "°C + 273.15"),
        ((Fahrenheit, Celsius), "(°F - 32) × 5/9"),
        ((Fahrenheit, Kelvin), "(°F - 32) × 5/9 + 273.15"),
        ((Kelvin, Celsius), "K - 273.15"),
        ((Kelvin, Fahrenheit), "(K - 273.15) × 9/5 + 32"),
    ]
};

/// Descriptive formula for an ordered pair
pub fn formula(from: TemperatureUnit, to: TemperatureUnit) -> &'static str {
    FORMULAS
        .iter()
        .find(|(pair, _)| *pair == (from, to))
        .map(|(_, formula)| *formula)
        .unwrap_or(DIRECT_CONVERSION)
}

/// The affine transform for an ordered pair. Same-unit pairs are the identity.
pub fn transform(from: TemperatureUnit, to: TemperatureUnit) -> fn(f64) -> f64 {
    use TemperatureUnit::*;
    match (from, to) {
        (Celsius, Fahrenheit) => |v| v * 9.0 / 5.0 + 32.0,
        (Celsius, Kelvin) => |v| v + 273.15,
        (Fahrenheit, Celsius) => |v| (v - 32.0) * 5.0 / 9.0,
        (Fahrenheit, Kelvin) => |v| (v - 32.0) * 5.0 / 9.0 + 273.15,
        (Kelvin, Celsius) => |v| v - 273.15,
        (Kelvin, Fahrenheit) => |v| (v - 273.15) * 9.0 / 5.0 + 32.0,
        (Celsius, Celsius) | (Fahrenheit, Fahrenheit) | (Kelvin, Kelvin) => |v| v,
    }
}

fn invalid_temperature_unit() -> ConvertError {
    ConvertError::invalid_unit("Invalid temperature unit. Valid units are: C, F, K")
}

/// Convert between temperature scales, rounding to the requested precision
pub fn convert(
    value: f64,
    from_unit: &str,
    to_unit: &str,
    options: &ConversionOptions,
) -> Result<ConversionResult, ConvertError> {
    let from = TemperatureUnit::parse(from_unit).ok_or_else(invalid_temperature_unit)?;
    let to = TemperatureUnit::parse(to_unit).ok_or_else(invalid_temperature_unit)?;
    let value = ensure_finite(value)?;

    let precision = options.precision();
    let converted = transform(from, to)(value);

    Ok(ConversionResult {
        from_value: value,
        from_unit: from_unit.to_string(),
        to_value: round_to(converted, precision, options.rounding),
        to_unit: to_unit.to_string(),
        formula: formula(from, to).to_string(),
        precision,
    })
}

/// Validity of a temperature symbol; invalid symbols get `C`, `F`, `K` as suggestions
pub fn validate_unit(unit: &str) -> ValidationResult {
    if is_temperature_unit(unit) {
        return ValidationResult::valid();
    }
    ValidationResult::from_parts(
        vec![format!("Invalid temperature unit: {}", unit)],
        vec!["C".to_string(), "F".to_string(), "K".to_string()],
    )
}
