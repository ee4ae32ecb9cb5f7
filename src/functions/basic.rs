use std::sync::Arc;

use super::{binary, unary};
use crate::engine::{operand_mismatch, Evaluator};

pub(crate) fn register(evaluator: &mut Evaluator) {
    evaluator.add_builtin("sqrt", 1, unary("sqrt", f64::sqrt));
    evaluator.add_builtin("cbrt", 1, unary("cbrt", f64::cbrt));
    evaluator.add_builtin("abs", 1, unary("abs", f64::abs));
    evaluator.add_builtin("pow", 2, binary("pow", f64::powf));

    // min/max return the chosen operand itself so its exact decimal side
    // survives for later precision-sensitive chaining.
    evaluator.add_builtin(
        "min",
        2,
        Arc::new(|args| match args {
            [a, b] => Ok(if a.float().min(b.float()) == a.float() { *a } else { *b }),
            _ => Err(operand_mismatch("min", 2, args.len())),
        }),
    );
    evaluator.add_builtin(
        "max",
        2,
        Arc::new(|args| match args {
            [a, b] => Ok(if a.float().max(b.float()) == a.float() { *a } else { *b }),
            _ => Err(operand_mismatch("max", 2, args.len())),
        }),
    );
}
