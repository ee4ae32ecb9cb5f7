//! Math-expression evaluation engine.
//!
//! Tokenizes, validates and evaluates textual arithmetic expressions
//! (numbers, `+ - * / % ^`, parenthesized groups, named functions,
//! variables and unit-conversion tags like `[ft->in]`) while keeping a
//! persistent variable namespace across calls. Arithmetic runs on a
//! dual-precision value ([`PreciseNumber`]) so decimal chains stay exact
//! and transcendental results fall back to floating point.
//!
//! ```
//! use mathpad_rs::Evaluator;
//!
//! let mut evaluator = Evaluator::new();
//! assert_eq!(evaluator.evaluate("x = 2 + 3 * 4").unwrap(), Some(14.0));
//! assert_eq!(evaluator.evaluate("x [ft->in]").unwrap(), Some(168.0));
//! assert_eq!(evaluator.evaluate("answer / 14").unwrap(), Some(12.0));
//! assert_eq!(evaluator.evaluate("x = ").unwrap(), None); // clears x
//! ```

pub mod engine;
pub mod error;
pub mod functions;
pub mod units;

pub use engine::{Evaluator, ExprNode, MathFunction, Operator, PreciseNumber, VariableStore};
pub use error::EvalError;
pub use units::{Conversion, ConversionTable};

/// One-shot convenience wrapper: evaluates a single expression against a
/// fresh evaluator. Callers that need the persistent variable namespace
/// hold an [`Evaluator`] instead.
pub fn evaluate_expression(expression: &str) -> Result<Option<f64>, EvalError> {
    let mut evaluator = Evaluator::new();
    evaluator.evaluate(expression)
}
