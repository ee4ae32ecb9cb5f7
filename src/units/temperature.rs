use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::Conversion;

const ZERO: Decimal = dec!(0);
const ONE: Decimal = dec!(1);
const FIVE: Decimal = dec!(5);
const NINE: Decimal = dec!(9);
const FREEZING_F: Decimal = dec!(32);
const KELVIN_OFFSET: Decimal = dec!(273.15);
const ABSOLUTE_ZERO_F: Decimal = dec!(459.67);

/// Temperature is the one additive family: every ordered pair gets its
/// own documented linear formula `(value + pre) * num / den + post`.
pub(super) fn register(table: &mut HashMap<String, Conversion>) {
    let pairs: [(&str, Conversion); 6] = [
        (
            "c->f",
            Conversion::Linear { pre: ZERO, num: NINE, den: FIVE, post: FREEZING_F },
        ),
        (
            "f->c",
            Conversion::Linear { pre: -FREEZING_F, num: FIVE, den: NINE, post: ZERO },
        ),
        (
            "c->k",
            Conversion::Linear { pre: ZERO, num: ONE, den: ONE, post: KELVIN_OFFSET },
        ),
        (
            "k->c",
            Conversion::Linear { pre: ZERO, num: ONE, den: ONE, post: -KELVIN_OFFSET },
        ),
        (
            "f->k",
            Conversion::Linear { pre: ABSOLUTE_ZERO_F, num: FIVE, den: NINE, post: ZERO },
        ),
        (
            "k->f",
            Conversion::Linear { pre: ZERO, num: NINE, den: FIVE, post: -ABSOLUTE_ZERO_F },
        ),
    ];
    for (key, conversion) in pairs {
        table.insert(key.to_string(), conversion);
    }
}
