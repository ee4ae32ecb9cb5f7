use super::unary;
use crate::engine::Evaluator;

pub(crate) fn register(evaluator: &mut Evaluator) {
    evaluator.add_builtin("round", 1, unary("round", f64::round));
    evaluator.add_builtin("truncate", 1, unary("truncate", f64::trunc));
    evaluator.add_builtin("floor", 1, unary("floor", f64::floor));
    evaluator.add_builtin("ceiling", 1, unary("ceiling", f64::ceil));
}
