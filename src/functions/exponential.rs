use super::unary;
use crate::engine::Evaluator;

pub(crate) fn register(evaluator: &mut Evaluator) {
    evaluator.add_builtin("exp", 1, unary("exp", f64::exp));
    evaluator.add_builtin("log", 1, unary("log", f64::ln));
    evaluator.add_builtin("log10", 1, unary("log10", f64::log10));
    evaluator.add_builtin("log2", 1, unary("log2", f64::log2));
}
