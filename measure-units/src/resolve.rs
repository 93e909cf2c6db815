//! Category resolution - which physical quantity a unit symbol measures

use measure_core::Category;
use tracing::trace;

use crate::tables::{UnitTables, TABLES};
use crate::temperature::is_temperature_unit;

/// Resolve `unit` against the built-in tables
pub fn resolve(unit: &str) -> Option<Category> {
    resolve_in(&TABLES, unit)
}

/// First category, in `Category::ALL` order, whose table holds `unit`.
/// Returns `None` rather than an error; callers decide if that is fatal.
pub fn resolve_in(tables: &UnitTables, unit: &str) -> Option<Category> {
    let category = Category::ALL.iter().copied().find(|&category| match category {
        Category::Temperature => is_temperature_unit(unit),
        _ => tables.get(category).is_some_and(|table| table.contains(unit)),
    });
    trace!(unit, ?category, "resolved unit category");
    category
}
