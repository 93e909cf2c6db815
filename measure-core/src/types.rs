//! Request, option and result types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::number::{format_number, DEFAULT_PRECISION};

/// Physical quantity a unit symbol belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Length,
    Weight,
    Volume,
    Area,
    Pressure,
    Energy,
    Speed,
    Data,
    Temperature,
}

impl Category {
    /// All categories in resolution order
    pub const ALL: [Category; 9] = [
        Category::Length,
        Category::Weight,
        Category::Volume,
        Category::Area,
        Category::Pressure,
        Category::Energy,
        Category::Speed,
        Category::Data,
        Category::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Weight => "weight",
            Category::Volume => "volume",
            Category::Area => "area",
            Category::Pressure => "pressure",
            Category::Energy => "energy",
            Category::Speed => "speed",
            Category::Data => "data",
            Category::Temperature => "temperature",
        }
    }

    /// Units of this category relate by a single multiplicative factor
    pub fn is_linear(&self) -> bool {
        !matches!(self, Category::Temperature)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// How a result is brought to `precision` digits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Half away from zero
    #[default]
    Round,
    Ceil,
    Floor,
}

/// Per-call conversion options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Decimal digits kept in the result (default 4)
    pub precision: Option<u32>,
    pub rounding: RoundingMode,
}

impl ConversionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Effective precision
    pub fn precision(&self) -> u32 {
        self.precision.unwrap_or(DEFAULT_PRECISION)
    }

    /// Options for one request of a batch: the request's precision wins
    pub fn for_request(&self, request: &ConversionRequest) -> ConversionOptions {
        ConversionOptions {
            precision: request.precision.or(self.precision),
            ..self.clone()
        }
    }
}

/// A single conversion to perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl ConversionRequest {
    pub fn new(value: f64, from_unit: impl Into<String>, to_unit: impl Into<String>) -> Self {
        Self {
            value,
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            precision: None,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }
}

/// Outcome of a conversion. Unit symbols are echoed as the caller spelled them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub from_value: f64,
    pub from_unit: String,
    /// Rounded to `precision` decimal digits
    pub to_value: f64,
    pub to_unit: String,
    pub formula: String,
    pub precision: u32,
}

impl ConversionResult {
    /// Render as a sentence
    pub fn format(&self, style: FormatStyle) -> String {
        match style {
            FormatStyle::Short => format!(
                "{} {} = {} {}",
                format_number(self.from_value),
                self.from_unit,
                format_number(self.to_value),
                self.to_unit
            ),
            FormatStyle::Long => format!(
                "{} {} is equal to {} {}",
                format_number(self.from_value),
                self.from_unit,
                format_number(self.to_value),
                self.to_unit
            ),
        }
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(FormatStyle::Short))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatStyle {
    #[default]
    Short,
    Long,
}

/// Validity of one or two unit symbols, reported as data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// At most 3, in unit-listing order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: None,
            suggestions: None,
        }
    }

    /// Empty `errors` means valid; empty `suggestions` are omitted
    pub fn from_parts(errors: Vec<String>, suggestions: Vec<String>) -> Self {
        if errors.is_empty() {
            return Self::valid();
        }
        Self {
            is_valid: false,
            errors: Some(errors),
            suggestions: if suggestions.is_empty() {
                None
            } else {
                Some(suggestions)
            },
        }
    }

    pub fn suggestions(&self) -> &[String] {
        self.suggestions.as_deref().unwrap_or(&[])
    }

    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or(&[])
    }
}

/// Measurement system a unit comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    Imperial,
    Other,
}

/// Descriptive metadata for a known unit symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub symbol: String,
    pub name: String,
    pub category: Category,
    pub system: UnitSystem,
    /// Scale relative to the category's base unit; `None` for temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
}
