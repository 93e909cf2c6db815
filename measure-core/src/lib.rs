//! Measure Core - Shared types for unit conversion
//!
//! This crate provides:
//! - `Category`: the physical quantity a unit belongs to
//! - Request/option/result types exchanged with callers
//! - `ConvertError`: the error taxonomy, plus a structured report for front-ends
//! - Rounding helpers shared by every converter

pub mod error;
pub mod number;
pub mod types;

pub use error::{codes, ConvertError, ErrorReport};
pub use number::{ensure_finite, format_number, round_to, DEFAULT_PRECISION};
pub use types::{
    Category, ConversionOptions, ConversionRequest, ConversionResult, FormatStyle,
    ParseCategoryError, RoundingMode, UnitDefinition, UnitSystem, ValidationResult,
};
