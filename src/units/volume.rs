use std::collections::HashMap;

use rust_decimal_macros::dec;

use super::{register_scaled_family, Conversion, ScaledUnit};

/// Volume units, factors in liters. US customary measures with their
/// exact metric definitions.
const UNITS: &[ScaledUnit] = &[
    ScaledUnit { abbrev: "ml", factor: dec!(0.001) },
    ScaledUnit { abbrev: "l", factor: dec!(1) },
    ScaledUnit { abbrev: "tsp", factor: dec!(0.00492892159375) },
    ScaledUnit { abbrev: "tbsp", factor: dec!(0.01478676478125) },
    ScaledUnit { abbrev: "floz", factor: dec!(0.0295735295625) },
    ScaledUnit { abbrev: "cup", factor: dec!(0.2365882365) },
    ScaledUnit { abbrev: "pt", factor: dec!(0.473176473) },
    ScaledUnit { abbrev: "qt", factor: dec!(0.946352946) },
    ScaledUnit { abbrev: "gal", factor: dec!(3.785411784) },
];

pub(super) fn register(table: &mut HashMap<String, Conversion>) {
    register_scaled_family(table, UNITS);
}
