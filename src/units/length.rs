use std::collections::HashMap;

use rust_decimal_macros::dec;

use super::{register_scaled_family, Conversion, ScaledUnit};

/// Length units, factors in meters.
const UNITS: &[ScaledUnit] = &[
    ScaledUnit { abbrev: "mm", factor: dec!(0.001) },
    ScaledUnit { abbrev: "cm", factor: dec!(0.01) },
    ScaledUnit { abbrev: "m", factor: dec!(1) },
    ScaledUnit { abbrev: "km", factor: dec!(1000) },
    ScaledUnit { abbrev: "in", factor: dec!(0.0254) },
    ScaledUnit { abbrev: "ft", factor: dec!(0.3048) },
    ScaledUnit { abbrev: "yd", factor: dec!(0.9144) },
    ScaledUnit { abbrev: "mi", factor: dec!(1609.344) },
];

pub(super) fn register(table: &mut HashMap<String, Conversion>) {
    register_scaled_family(table, UNITS);
}
