use std::collections::HashMap;

use rust_decimal_macros::dec;

use super::{register_rate_family, Conversion, RateUnit};

/// Speed units as distance-over-time factor pairs relative to meters per
/// second. Keeping numerator and denominator separate preserves precision
/// that a single combined constant would lose (one knot is exactly
/// 1852/3600 m/s).
const UNITS: &[RateUnit] = &[
    RateUnit { abbrev: "mps", num: dec!(1), den: dec!(1) },
    RateUnit { abbrev: "kph", num: dec!(1000), den: dec!(3600) },
    RateUnit { abbrev: "mph", num: dec!(1609.344), den: dec!(3600) },
    RateUnit { abbrev: "kn", num: dec!(1852), den: dec!(3600) },
    RateUnit { abbrev: "fps", num: dec!(0.3048), den: dec!(1) },
];

pub(super) fn register(table: &mut HashMap<String, Conversion>) {
    register_rate_family(table, UNITS);
}
