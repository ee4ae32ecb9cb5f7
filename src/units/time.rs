use std::collections::HashMap;

use rust_decimal_macros::dec;

use super::{register_scaled_family, Conversion, ScaledUnit};

/// Time units, factors in seconds. A year is the Julian year of 365.25
/// days.
const UNITS: &[ScaledUnit] = &[
    ScaledUnit { abbrev: "ms", factor: dec!(0.001) },
    ScaledUnit { abbrev: "s", factor: dec!(1) },
    ScaledUnit { abbrev: "min", factor: dec!(60) },
    ScaledUnit { abbrev: "h", factor: dec!(3600) },
    ScaledUnit { abbrev: "d", factor: dec!(86400) },
    ScaledUnit { abbrev: "wk", factor: dec!(604800) },
    ScaledUnit { abbrev: "yr", factor: dec!(31557600) },
];

pub(super) fn register(table: &mut HashMap<String, Conversion>) {
    register_scaled_family(table, UNITS);
}
