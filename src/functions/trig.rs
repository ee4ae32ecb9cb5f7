use super::{binary, unary};
use crate::engine::Evaluator;

pub(crate) fn register(evaluator: &mut Evaluator) {
    evaluator.add_builtin("sin", 1, unary("sin", f64::sin));
    evaluator.add_builtin("cos", 1, unary("cos", f64::cos));
    evaluator.add_builtin("tan", 1, unary("tan", f64::tan));
    evaluator.add_builtin("asin", 1, unary("asin", f64::asin));
    evaluator.add_builtin("acos", 1, unary("acos", f64::acos));
    evaluator.add_builtin("atan", 1, unary("atan", f64::atan));
    evaluator.add_builtin("sinh", 1, unary("sinh", f64::sinh));
    evaluator.add_builtin("cosh", 1, unary("cosh", f64::cosh));
    evaluator.add_builtin("tanh", 1, unary("tanh", f64::tanh));
    evaluator.add_builtin("atan2", 2, binary("atan2", f64::atan2));
}
