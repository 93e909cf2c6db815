//! Unit tables - one scale-factor table per linear category

use std::sync::LazyLock;

use measure_core::{Category, UnitSystem};

use crate::temperature::TemperatureUnit;

/// Global table registry, built once on first use
pub static TABLES: LazyLock<UnitTables> = LazyLock::new(UnitTables::new);

/// One unit symbol and its scale relative to the table's base unit
#[derive(Debug, Clone, PartialEq)]
pub struct UnitEntry {
    pub symbol: String,
    pub name: String,
    pub system: UnitSystem,
    pub factor: f64,
}

/// Mapping from lowercase unit symbol to scale factor, in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitTable {
    entries: Vec<UnitEntry>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an anonymous table from `(symbol, factor)` pairs
    pub fn from_factors<'a>(factors: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let mut table = Self::new();
        for (symbol, factor) in factors {
            table.register(symbol, symbol, UnitSystem::Other, factor);
        }
        table
    }

    /// Add a unit; re-registering a symbol replaces it in place
    pub fn register(&mut self, symbol: &str, name: &str, system: UnitSystem, factor: f64) {
        let entry = UnitEntry {
            symbol: symbol.to_lowercase(),
            name: name.to_string(),
            system,
            factor,
        };
        match self.entries.iter_mut().find(|e| e.symbol == entry.symbol) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Case-insensitive lookup
    pub fn get(&self, symbol: &str) -> Option<&UnitEntry> {
        let symbol = symbol.to_lowercase();
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    pub fn factor(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).map(|e| e.factor)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    /// Symbols in registration order
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.symbol.as_str())
    }

    pub fn entries(&self) -> &[UnitEntry] {
        &self.entries
    }

    /// The symbol whose factor is exactly 1
    pub fn base_unit(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.factor == 1.0)
            .map(|e| e.symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Every linear category's table, in resolution order
pub struct UnitTables {
    tables: Vec<(Category, UnitTable)>,
}

impl UnitTables {
    pub fn new() -> Self {
        let tables = Category::ALL
            .iter()
            .filter(|category| category.is_linear())
            .filter_map(|&category| builtin_table(category).map(|table| (category, table)))
            .collect();
        UnitTables { tables }
    }

    /// Table for a linear category; `None` for temperature
    pub fn get(&self, category: Category) -> Option<&UnitTable> {
        self.tables
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, table)| table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &UnitTable)> {
        self.tables.iter().map(|(c, table)| (*c, table))
    }

    /// Symbols of one category, temperature included
    pub fn symbols(&self, category: Category) -> Vec<&str> {
        match category {
            Category::Temperature => TemperatureUnit::ALL.iter().map(|u| u.symbol()).collect(),
            _ => self
                .get(category)
                .map(|table| table.symbols().collect())
                .unwrap_or_default(),
        }
    }

    /// Symbols of every category, concatenated in resolution order
    pub fn all_symbols(&self) -> Vec<&str> {
        Category::ALL
            .iter()
            .flat_map(|&category| self.symbols(category))
            .collect()
    }
}

impl Default for UnitTables {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_table(category: Category) -> Option<UnitTable> {
    let table = match category {
        Category::Length => length_units(),
        Category::Weight => weight_units(),
        Category::Volume => volume_units(),
        Category::Area => area_units(),
        Category::Pressure => pressure_units(),
        Category::Energy => energy_units(),
        Category::Speed => speed_units(),
        Category::Data => data_units(),
        Category::Temperature => return None,
    };
    Some(table)
}

/// Curated subset per category for display pickers
pub fn common_units(category: Category) -> &'static [&'static str] {
    match category {
        Category::Length => &["m", "km", "cm", "mm", "mile", "foot", "inch"],
        Category::Weight => &["kg", "g", "lb", "oz"],
        Category::Volume => &["l", "ml", "gal", "cup"],
        Category::Temperature => &["c", "f", "k"],
        Category::Area => &["m2", "km2", "ha", "acre"],
        Category::Pressure => &["pa", "bar", "psi", "atm"],
        Category::Energy => &["j", "kj", "cal", "kwh"],
        Category::Speed => &["kph", "mph", "mps"],
        Category::Data => &["kb", "mb", "gb", "tb"],
    }
}

use UnitSystem::{Imperial, Metric, Other};

// Base: meter
fn length_units() -> UnitTable {
    let mut t = UnitTable::new();
    t.register("m", "meter", Metric, 1.0);
    t.register("km", "kilometer", Metric, 1000.0);
    t.register("cm", "centimeter", Metric, 0.01);
    t.register("mm", "millimeter", Metric, 0.001);
    t.register("mile", "mile", Imperial, 1609.344);
    t.register("yard", "yard", Imperial, 0.9144);
    t.register("foot", "foot", Imperial, 0.3048);
    t.register("inch", "inch", Imperial, 0.0254);
    // nautical mile, not nanometer
    t.register("nm", "nautical mile", Other, 1852.0);
    t.register("μm", "micrometer", Metric, 0.000001);
    t.register("pm", "picometer", Metric, 1e-12);
    t
}

// Base: kilogram
fn weight_units() -> UnitTable {
    let mut t = UnitTable::new();
    t.register("kg", "kilogram", Metric, 1.0);
    t.register("g", "gram", Metric, 0.001);
    t.register("mg", "milligram", Metric, 0.000001);
    t.register("t", "tonne", Metric, 1000.0);
    t.register("lb", "pound", Imperial, 0.45359237);
    t.register("oz", "ounce", Imperial, 0.028349523125);
    t.register("st", "stone", Imperial, 6.35029318);
    t
}

// Base: liter
fn volume_units() -> UnitTable {
    let mut t = UnitTable::new();
    t.register("l", "liter", Metric, 1.0);
    t.register("ml", "milliliter", Metric, 0.001);
    t.register("m3", "cubic meter", Metric, 1000.0);
    t.register("gal", "US gallon", Imperial, 3.785411784);
    t.register("qt", "US quart", Imperial, 0.946352946);
    t.register("pt", "US pint", Imperial, 0.473176473);
    t.register("cup", "US cup", Imperial, 0.2365882365);
    t.register("floz", "US fluid ounce", Imperial, 0.0295735295625);
    t.register("tbsp", "tablespoon", Imperial, 0.01478676478125);
    t.register("tsp", "teaspoon", Imperial, 0.00492892159375);
    t
}

// Base: square meter
fn area_units() -> UnitTable {
    let mut t = UnitTable::new();
    t.register("m2", "square meter", Metric, 1.0);
    t.register("km2", "square kilometer", Metric, 1000000.0);
    t.register("cm2", "square centimeter", Metric, 0.0001);
    t.register("mm2", "square millimeter", Metric, 0.000001);
    t.register("ha", "hectare", Metric, 10000.0);
    t.register("acre", "acre", Imperial, 4046.86);
    t.register("sqft", "square foot", Imperial, 0.092903);
    t.register("sqin", "square inch", Imperial, 0.00064516);
    t
}

// Base: pascal
fn pressure_units() -> UnitTable {
    let mut t = UnitTable::new();
    t.register("pa", "pascal", Metric, 1.0);
    t.register("kpa", "kilopascal", Metric, 1000.0);
    t.register("mpa", "megapascal", Metric, 1000000.0);
    t.register("bar", "bar", Metric, 100000.0);
    t.register("mbar", "millibar", Metric, 100.0);
    t.register("psi", "pound per square inch", Imperial, 6894.757293168);
    t.register("atm", "standard atmosphere", Other, 101325.0);
    t.register("mmhg", "millimeter of mercury", Other, 133.322387415);
    t.register("torr", "torr", Other, 133.32236842105263);
    t
}

// Base: joule
fn energy_units() -> UnitTable {
    let mut t = UnitTable::new();
    t.register("j", "joule", Metric, 1.0);
    t.register("kj", "kilojoule", Metric, 1000.0);
    t.register("cal", "calorie", Other, 4.184);
    t.register("kcal", "kilocalorie", Other, 4184.0);
    t.register("wh", "watt hour", Metric, 3600.0);
    t.register("kwh", "kilowatt hour", Metric, 3600000.0);
    t.register("btu", "British thermal unit", Imperial, 1055.05585262);
    t.register("ev", "electronvolt", Other, 1.602176634e-19);
    t
}

// Base: meter per second
fn speed_units() -> UnitTable {
    let mut t = UnitTable::new();
    t.register("mps", "meter per second", Metric, 1.0);
    t.register("kph", "kilometer per hour", Metric, 1.0 / 3.6);
    t.register("mph", "mile per hour", Imperial, 0.44704);
    t.register("fps", "foot per second", Imperial, 0.3048);
    t.register("knot", "knot", Other, 1852.0 / 3600.0);
    t
}

// Base: byte, binary multiples
fn data_units() -> UnitTable {
    let mut t = UnitTable::new();
    t.register("b", "byte", Other, 1.0);
    t.register("bit", "bit", Other, 0.125);
    t.register("kb", "kilobyte", Other, 1024.0);
    t.register("mb", "megabyte", Other, 1048576.0);
    t.register("gb", "gigabyte", Other, 1073741824.0);
    t.register("tb", "terabyte", Other, 1099511627776.0);
    t
}
