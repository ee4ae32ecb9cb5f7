//! Unit-conversion tables: six independent families, each with
//! abbreviation metadata and exact `Decimal` conversion formulas relative
//! to a family base unit. The full cross-product of distinct unit pairs
//! within a family is precomputed into one lookup table keyed by the
//! literal tag text `from->to`.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::engine::PreciseNumber;

mod length;
mod mass;
mod speed;
mod temperature;
mod time;
mod volume;

/// Resolved conversion formula for one ordered unit pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// Multiplicative families: `result = value * from / to`.
    Factor { from: Decimal, to: Decimal },
    /// Speed keeps separate distance/time factor pairs per unit to avoid
    /// folding them into a single lossy constant:
    /// `result = value * from_num * to_den / (from_den * to_num)`.
    Ratio {
        from_num: Decimal,
        from_den: Decimal,
        to_num: Decimal,
        to_den: Decimal,
    },
    /// Additive families (temperature):
    /// `result = (value + pre) * num / den + post`.
    Linear {
        pre: Decimal,
        num: Decimal,
        den: Decimal,
        post: Decimal,
    },
}

impl Conversion {
    /// Applies the formula on the decimal side when the operand carries
    /// one, with a floating-point fallback that lets non-finite values
    /// propagate.
    pub fn apply(&self, value: PreciseNumber) -> PreciseNumber {
        if let Some(d) = value.decimal() {
            if let Some(exact) = self.apply_decimal(d) {
                return PreciseNumber::from_decimal(exact);
            }
        }
        PreciseNumber::from_f64(self.apply_float(value.float()))
    }

    fn apply_decimal(&self, value: Decimal) -> Option<Decimal> {
        match self {
            Conversion::Factor { from, to } => value.checked_mul(*from)?.checked_div(*to),
            Conversion::Ratio {
                from_num,
                from_den,
                to_num,
                to_den,
            } => value
                .checked_mul(*from_num)?
                .checked_mul(*to_den)?
                .checked_div(from_den.checked_mul(*to_num)?),
            Conversion::Linear {
                pre,
                num,
                den,
                post,
            } => value
                .checked_add(*pre)?
                .checked_mul(*num)?
                .checked_div(*den)?
                .checked_add(*post),
        }
    }

    fn apply_float(&self, value: f64) -> f64 {
        match self {
            Conversion::Factor { from, to } => value * as_f64(*from) / as_f64(*to),
            Conversion::Ratio {
                from_num,
                from_den,
                to_num,
                to_den,
            } => value * as_f64(*from_num) * as_f64(*to_den) / (as_f64(*from_den) * as_f64(*to_num)),
            Conversion::Linear {
                pre,
                num,
                den,
                post,
            } => (value + as_f64(*pre)) * as_f64(*num) / as_f64(*den) + as_f64(*post),
        }
    }
}

fn as_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(f64::NAN)
}

/// A unit of a multiplicative family: abbreviation plus one exact factor
/// relative to the family base.
pub(crate) struct ScaledUnit {
    pub abbrev: &'static str,
    pub factor: Decimal,
}

/// A speed unit: distance factor over time factor relative to the base.
pub(crate) struct RateUnit {
    pub abbrev: &'static str,
    pub num: Decimal,
    pub den: Decimal,
}

/// Lookup table over every family, keyed by `from->to` with whitespace
/// already stripped. A key exists iff both abbreviations belong to the
/// same family and are distinct.
pub struct ConversionTable {
    table: HashMap<String, Conversion>,
}

impl ConversionTable {
    pub fn new() -> Self {
        let mut table = HashMap::new();
        length::register(&mut table);
        mass::register(&mut table);
        speed::register(&mut table);
        temperature::register(&mut table);
        time::register(&mut table);
        volume::register(&mut table);
        ConversionTable { table }
    }

    pub fn get(&self, key: &str) -> Option<&Conversion> {
        self.table.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for ConversionTable {
    fn default() -> Self {
        ConversionTable::new()
    }
}

pub(crate) fn register_scaled_family(
    table: &mut HashMap<String, Conversion>,
    units: &[ScaledUnit],
) {
    for from in units {
        for to in units {
            if from.abbrev != to.abbrev {
                table.insert(
                    format!("{}->{}", from.abbrev, to.abbrev),
                    Conversion::Factor {
                        from: from.factor,
                        to: to.factor,
                    },
                );
            }
        }
    }
}

pub(crate) fn register_rate_family(table: &mut HashMap<String, Conversion>, units: &[RateUnit]) {
    for from in units {
        for to in units {
            if from.abbrev != to.abbrev {
                table.insert(
                    format!("{}->{}", from.abbrev, to.abbrev),
                    Conversion::Ratio {
                        from_num: from.num,
                        from_den: from.den,
                        to_num: to.num,
                        to_den: to.den,
                    },
                );
            }
        }
    }
}
