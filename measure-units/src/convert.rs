//! Category-aware conversion API

use measure_core::{
    Category, ConversionOptions, ConversionRequest, ConversionResult, ConvertError, FormatStyle,
    UnitDefinition, ValidationResult,
};
use tracing::debug;

use crate::linear;
use crate::resolve::resolve;
use crate::suggest::{suggest, MAX_SUGGESTIONS};
use crate::tables::TABLES;
use crate::temperature::{self, TemperatureUnit};

/// Convert `value` between any two units of the same category.
///
/// The category comes from `from_unit`. A `to_unit` that resolves nowhere,
/// or to another category, fails fast with `InvalidUnit`.
pub fn convert(
    value: f64,
    from_unit: &str,
    to_unit: &str,
    options: &ConversionOptions,
) -> Result<ConversionResult, ConvertError> {
    let category = resolve(from_unit).ok_or_else(|| ConvertError::unsupported_unit(from_unit))?;

    match resolve(to_unit) {
        None => return Err(ConvertError::unsupported_unit(to_unit)),
        Some(to_category) if to_category != category => {
            return Err(ConvertError::incompatible(from_unit, category, to_unit, to_category));
        }
        Some(_) => {}
    }

    debug!(value, from_unit, to_unit, %category, "converting");

    match category {
        Category::Temperature => temperature::convert(value, from_unit, to_unit, options),
        _ => {
            let table = TABLES.get(category).ok_or_else(|| {
                ConvertError::conversion(format!("No unit table for {}", category))
            })?;
            linear::convert(value, from_unit, to_unit, table, options)
        }
    }
}

/// Convert every request in order; the first failure aborts the batch.
pub fn batch_convert(
    requests: &[ConversionRequest],
    options: &ConversionOptions,
) -> Result<Vec<ConversionResult>, ConvertError> {
    debug!(count = requests.len(), "batch conversion");
    requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            convert(
                request.value,
                &request.from_unit,
                &request.to_unit,
                &options.for_request(request),
            )
            .inspect_err(|e| debug!(index, error = %e, "batch aborted"))
        })
        .collect()
}

/// Whether `unit` is known, with close matches when it is not
pub fn validate_unit(unit: &str) -> ValidationResult {
    if resolve(unit).is_some() {
        return ValidationResult::valid();
    }
    ValidationResult::from_parts(
        vec![format!("Unknown unit: {}", unit)],
        suggest(unit, TABLES.all_symbols(), MAX_SUGGESTIONS),
    )
}

/// Whether `from_unit` can be converted to `to_unit`
pub fn validate_units(from_unit: &str, to_unit: &str) -> ValidationResult {
    let mut errors = Vec::new();
    let mut suggestions = Vec::new();
    let all = TABLES.all_symbols();

    let from_category = resolve(from_unit);
    if from_category.is_none() {
        errors.push(format!("Invalid source unit: {}", from_unit));
        suggestions.extend(suggest(from_unit, all.iter().copied(), MAX_SUGGESTIONS));
    }

    let to_category = resolve(to_unit);
    if to_category.is_none() {
        errors.push(format!("Invalid target unit: {}", to_unit));
        for s in suggest(to_unit, all.iter().copied(), MAX_SUGGESTIONS) {
            if !suggestions.contains(&s) {
                suggestions.push(s);
            }
        }
    }

    if let (Some(from), Some(to)) = (from_category, to_category) {
        if from != to {
            errors.push(ConvertError::incompatible(from_unit, from, to_unit, to).to_string());
        }
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    ValidationResult::from_parts(errors, suggestions)
}

/// Symbols of one category, or of all categories in resolution order
pub fn available_units(category: Option<Category>) -> Vec<&'static str> {
    match category {
        Some(category) => TABLES.symbols(category),
        None => TABLES.all_symbols(),
    }
}

pub fn supported_categories() -> Vec<Category> {
    Category::ALL.to_vec()
}

pub use crate::tables::common_units;

/// Metadata for a known symbol
pub fn describe_unit(symbol: &str) -> Option<UnitDefinition> {
    let category = resolve(symbol)?;
    match category {
        Category::Temperature => {
            let unit = TemperatureUnit::parse(symbol)?;
            Some(UnitDefinition {
                symbol: unit.symbol().to_string(),
                name: unit.name().to_string(),
                category,
                system: unit.system(),
                factor: None,
            })
        }
        _ => {
            let entry = TABLES.get(category)?.get(symbol)?;
            Some(UnitDefinition {
                symbol: entry.symbol.clone(),
                name: entry.name.clone(),
                category,
                system: entry.system,
                factor: Some(entry.factor),
            })
        }
    }
}

pub fn format_result(result: &ConversionResult, style: FormatStyle) -> String {
    result.format(style)
}
