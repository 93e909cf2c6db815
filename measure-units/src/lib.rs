//! Measure Units - Unit conversion across physical quantities
//!
//! Converts numeric values between units of one category and returns the
//! rounded value together with a human-readable formula.
//!
//! Categories:
//! - Length (m, km, mile, foot, inch, etc.)
//! - Weight (kg, g, lb, oz, etc.)
//! - Volume (l, ml, gal, cup, etc.)
//! - Area (m2, km2, ha, acre, etc.)
//! - Pressure (pa, bar, psi, atm, etc.)
//! - Energy (j, kj, cal, kwh, etc.)
//! - Speed (mps, kph, mph, etc.)
//! - Data (b, kb, mb, gb, tb)
//! - Temperature (c, f, k) - affine, handled separately
//!
//! Every linear category converts through its base unit with a single
//! factor table. Unit symbols are case-insensitive.

mod convert;
pub mod linear;
pub mod resolve;
pub mod suggest;
pub mod tables;
pub mod temperature;

pub use convert::{
    available_units, batch_convert, common_units, convert, describe_unit, format_result,
    supported_categories, validate_unit, validate_units,
};
pub use resolve::resolve;
pub use suggest::suggest;
pub use tables::{UnitEntry, UnitTable, UnitTables, TABLES};
pub use temperature::TemperatureUnit;

pub use measure_core::{
    Category, ConversionOptions, ConversionRequest, ConversionResult, ConvertError, FormatStyle,
    RoundingMode, UnitDefinition, UnitSystem, ValidationResult,
};
