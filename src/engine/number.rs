use std::fmt;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::error::EvalError;

/// Dual-precision numeric value used as the evaluator's calculation
/// currency.
///
/// The fixed-point side carries exact base-10 arithmetic for
/// precision-sensitive chains (`7464.36 - 7391.21` must be exactly
/// `73.15`); the floating side represents results the fixed-point type
/// cannot (transcendental functions, NaN, infinities). Both sides are
/// derived from the same source at construction. Once a value is
/// non-finite only the float side is authoritative and decimal arithmetic
/// is not attempted on it: NaN and infinities propagate unchanged instead
/// of raising errors.
#[derive(Clone, Copy)]
pub struct PreciseNumber {
    decimal: Option<Decimal>,
    float: f64,
}

impl PreciseNumber {
    /// Builds both representations from a floating-point value. The
    /// decimal side is absent for non-finite values and for finite values
    /// outside the fixed-point range.
    pub fn from_f64(value: f64) -> Self {
        let decimal = if value.is_finite() {
            Decimal::from_f64(value)
        } else {
            None
        };
        PreciseNumber {
            decimal,
            float: value,
        }
    }

    /// Builds both representations from an exact decimal value.
    pub fn from_decimal(value: Decimal) -> Self {
        PreciseNumber {
            decimal: Some(value),
            float: value.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Parses a numeric literal into both representations from the same
    /// text, so `7464.36` is exact on the decimal side.
    pub(crate) fn parse(literal: &str) -> Option<Self> {
        let float = literal.parse::<f64>().ok()?;
        Some(PreciseNumber {
            decimal: literal.parse::<Decimal>().ok(),
            float,
        })
    }

    pub fn float(&self) -> f64 {
        self.float
    }

    pub fn decimal(&self) -> Option<Decimal> {
        self.decimal
    }

    /// True iff the value is an ordinary finite number.
    pub fn has_value(&self) -> bool {
        self.float.is_finite()
    }

    /// Applies a binary operation, preferring the exact decimal side when
    /// both operands carry one and the checked operation succeeds;
    /// otherwise falls back to floating point, which lets NaN and
    /// infinities propagate.
    fn combine(
        self,
        rhs: PreciseNumber,
        decimal_op: impl Fn(Decimal, Decimal) -> Option<Decimal>,
        float_op: impl Fn(f64, f64) -> f64,
    ) -> PreciseNumber {
        if let (Some(a), Some(b)) = (self.decimal, rhs.decimal) {
            if let Some(result) = decimal_op(a, b) {
                return PreciseNumber::from_decimal(result);
            }
        }
        PreciseNumber::from_f64(float_op(self.float, rhs.float))
    }

    pub(crate) fn subtract(self, rhs: PreciseNumber) -> PreciseNumber {
        self.combine(rhs, |a, b| a.checked_sub(b), |a, b| a - b)
    }

    pub(crate) fn multiply(self, rhs: PreciseNumber) -> PreciseNumber {
        self.combine(rhs, |a, b| a.checked_mul(b), |a, b| a * b)
    }

    pub(crate) fn divide(self, rhs: PreciseNumber) -> PreciseNumber {
        self.combine(rhs, |a, b| a.checked_div(b), |a, b| a / b)
    }

    pub(crate) fn remainder(self, rhs: PreciseNumber) -> PreciseNumber {
        self.combine(rhs, |a, b| a.checked_rem(b), |a, b| a % b)
    }

    /// Floating-point exponentiation. A finite result too large for the
    /// fixed-point type is an overflow failure: subsequent decimal
    /// chaining could not represent it.
    pub(crate) fn power(self, rhs: PreciseNumber) -> Result<PreciseNumber, EvalError> {
        let result = self.float.powf(rhs.float);
        if result.is_finite() && Decimal::from_f64(result).is_none() {
            return Err(EvalError::overflow(format!(
                "'{} ^ {}' exceeds the fixed-point range",
                self, rhs
            )));
        }
        Ok(PreciseNumber::from_f64(result))
    }
}

impl fmt::Display for PreciseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decimal {
            Some(d) if self.has_value() => write!(f, "{}", d),
            _ => write!(f, "{}", self.float),
        }
    }
}

impl fmt::Debug for PreciseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreciseNumber")
            .field("decimal", &self.decimal)
            .field("float", &self.float)
            .finish()
    }
}

/// Equality on the floating side, which is always populated.
impl PartialEq for PreciseNumber {
    fn eq(&self, other: &Self) -> bool {
        self.float == other.float
    }
}
