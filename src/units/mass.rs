use std::collections::HashMap;

use rust_decimal_macros::dec;

use super::{register_scaled_family, Conversion, ScaledUnit};

/// Mass units, factors in grams. The customary units use their exact
/// metric definitions.
const UNITS: &[ScaledUnit] = &[
    ScaledUnit { abbrev: "mg", factor: dec!(0.001) },
    ScaledUnit { abbrev: "g", factor: dec!(1) },
    ScaledUnit { abbrev: "kg", factor: dec!(1000) },
    ScaledUnit { abbrev: "t", factor: dec!(1000000) },
    ScaledUnit { abbrev: "oz", factor: dec!(28.349523125) },
    ScaledUnit { abbrev: "lb", factor: dec!(453.59237) },
    ScaledUnit { abbrev: "st", factor: dec!(6350.29318) },
];

pub(super) fn register(table: &mut HashMap<String, Conversion>) {
    register_scaled_family(table, UNITS);
}
