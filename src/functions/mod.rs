//! Built-in function registry: fixed-arity wrappers over the standard
//! floating-point math routines, registered on every new evaluator.

pub mod basic;
pub mod exponential;
pub mod rounding;
pub mod trig;

use std::sync::Arc;

use crate::engine::{operand_mismatch, Evaluator, MathFunction, PreciseNumber};

pub(crate) fn register_builtins(evaluator: &mut Evaluator) {
    basic::register(evaluator);
    rounding::register(evaluator);
    trig::register(evaluator);
    exponential::register(evaluator);
}

/// Wraps a one-argument float routine as a registry body.
pub(crate) fn unary(name: &'static str, f: fn(f64) -> f64) -> MathFunction {
    Arc::new(move |args| match args {
        [x] => Ok(PreciseNumber::from_f64(f(x.float()))),
        _ => Err(operand_mismatch(name, 1, args.len())),
    })
}

/// Wraps a two-argument float routine as a registry body.
pub(crate) fn binary(name: &'static str, f: fn(f64, f64) -> f64) -> MathFunction {
    Arc::new(move |args| match args {
        [a, b] => Ok(PreciseNumber::from_f64(f(a.float(), b.float()))),
        _ => Err(operand_mismatch(name, 2, args.len())),
    })
}
