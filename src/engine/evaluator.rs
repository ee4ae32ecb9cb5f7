use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::engine::parser::{Assignment, Parsed, Parser};
use crate::engine::{ExprNode, PreciseNumber, VariableStore};
use crate::error::EvalError;
use crate::functions;
use crate::units::ConversionTable;

/// Signature shared by built-in and caller-registered functions: a slice
/// of exactly `arity` operands in, one value out.
pub type MathFunction =
    Arc<dyn Fn(&[PreciseNumber]) -> Result<PreciseNumber, EvalError> + Send + Sync>;

pub(crate) struct FunctionEntry {
    pub arity: usize,
    pub body: MathFunction,
}

pub(crate) type FunctionRegistry = HashMap<String, FunctionEntry>;

/// The engine's entry point. Holds only the persistent state: variable
/// table, function registry and the precomputed conversion table. Every
/// `evaluate` call builds a fresh parser context, so instances are safe
/// to call repeatedly and independent instances are fully isolated.
pub struct Evaluator {
    variables: VariableStore,
    functions: FunctionRegistry,
    conversions: ConversionTable,
}

impl Evaluator {
    /// Builds an evaluator with the reserved variables seeded, the
    /// built-in function registry populated and the unit-conversion
    /// cross-product precomputed.
    pub fn new() -> Self {
        let mut evaluator = Evaluator {
            variables: VariableStore::new(),
            functions: FunctionRegistry::new(),
            conversions: ConversionTable::new(),
        };
        functions::register_builtins(&mut evaluator);
        evaluator
    }

    /// Evaluates one expression.
    ///
    /// Returns `Ok(Some(value))` on success, `Ok(None)` exactly when the
    /// input was a variable-clear request (`name =` with nothing after
    /// the equals sign), and an error for any parse or runtime failure.
    /// On success the reserved `answer` variable is updated; an
    /// assignment also stores the named variable. No variable is touched
    /// on failure.
    pub fn evaluate(&mut self, expression: &str) -> Result<Option<f64>, EvalError> {
        debug!("evaluating '{}'", expression);
        let parsed = self.parse(expression)?;

        if let Some(Assignment::Clear(name)) = &parsed.assignment {
            self.variables.remove(name);
            debug!("cleared variable '{}'", name);
            return Ok(None);
        }

        let result = self.run(&parsed.nodes, expression)?;
        let value = result.float();
        if let Some(Assignment::Set(name)) = &parsed.assignment {
            self.variables.set(name, value);
        }
        self.variables.set(crate::engine::variables::ANSWER, value);
        debug!("'{}' evaluated to {}", expression, value);
        Ok(Some(value))
    }

    pub(crate) fn parse(&self, expression: &str) -> Result<Parsed, EvalError> {
        Parser::parse(expression, &self.variables, &self.functions, &self.conversions)
    }

    /// Walks the postfix queue with an operand stack: each node pops its
    /// fixed operand count (in push order) and pushes one result.
    fn run(&self, nodes: &[ExprNode], expression: &str) -> Result<PreciseNumber, EvalError> {
        let mut stack: Vec<PreciseNumber> = Vec::new();
        for node in nodes {
            let count = node.arg_count();
            if stack.len() < count {
                return Err(EvalError::parse(expression, "not enough operands"));
            }
            let operands = stack.split_off(stack.len() - count);
            stack.push(node.evaluate(&operands)?);
        }
        match stack.pop() {
            Some(value) if stack.is_empty() => Ok(value),
            Some(_) => Err(EvalError::parse(
                expression,
                "expression does not reduce to a single value",
            )),
            None => Err(EvalError::parse(expression, "expression has no value")),
        }
    }

    /// Read access to the variable table.
    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Point lookup of a variable, case-insensitive.
    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name)
    }

    /// External variable mutation, validated by the same naming rules as
    /// an assignment expression.
    pub fn set_variable(&mut self, name: &str, value: f64) -> Result<(), EvalError> {
        if !VariableStore::is_valid_name(name) {
            return Err(EvalError::name(
                name,
                "variable names start with a letter followed by letters, digits or underscores",
            ));
        }
        if self.functions.contains_key(&name.to_lowercase()) {
            return Err(EvalError::name(name, "name is already a function"));
        }
        self.variables.set(name, value);
        Ok(())
    }

    /// Drops every user variable and re-seeds the reserved constants.
    pub fn reset_variables(&mut self) {
        self.variables.reset();
    }

    /// Registers a named function with a fixed arity. Fails if the name
    /// is invalid or collides (case-insensitively) with any known
    /// function.
    pub fn register_function<F>(&mut self, name: &str, arity: usize, body: F) -> Result<(), EvalError>
    where
        F: Fn(&[PreciseNumber]) -> Result<PreciseNumber, EvalError> + Send + Sync + 'static,
    {
        if !VariableStore::is_valid_name(name) {
            return Err(EvalError::name(
                name,
                "function names start with a letter followed by letters, digits or underscores",
            ));
        }
        let key = name.to_lowercase();
        if self.functions.contains_key(&key) {
            return Err(EvalError::name(name, "name is already a function"));
        }
        self.functions.insert(
            key,
            FunctionEntry {
                arity,
                body: Arc::new(body),
            },
        );
        Ok(())
    }

    /// Registration path for the built-ins; names are known-good.
    pub(crate) fn add_builtin(&mut self, name: &str, arity: usize, body: MathFunction) {
        self.functions
            .insert(name.to_string(), FunctionEntry { arity, body });
    }

    /// Sorted list of every known function name, built-in and registered.
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(evaluator: &mut Evaluator, expression: &str) -> f64 {
        evaluator
            .evaluate(expression)
            .unwrap_or_else(|e| panic!("'{}' failed: {}", expression, e))
            .unwrap_or_else(|| panic!("'{}' produced no value", expression))
    }

    #[test]
    fn test_simple_arithmetic() {
        let mut evaluator = Evaluator::new();
        assert_eq!(eval(&mut evaluator, "2 + 3"), 5.0);
        assert_eq!(eval(&mut evaluator, "10 - 5"), 5.0);
        assert_eq!(eval(&mut evaluator, "6 * 7"), 42.0);
        assert_eq!(eval(&mut evaluator, "9 / 3"), 3.0);
        assert_eq!(eval(&mut evaluator, "10 % 3"), 1.0);
        assert_eq!(eval(&mut evaluator, "2 ^ 10"), 1024.0);
    }

    #[test]
    fn test_precedence_and_grouping() {
        let mut evaluator = Evaluator::new();
        assert_eq!(eval(&mut evaluator, "2 + 3 * 4"), 14.0);
        assert_eq!(eval(&mut evaluator, "(2 + 3) * 4"), 20.0);
        assert_eq!(eval(&mut evaluator, "10 + 2 * 3 - 4 / 2"), 14.0);
        assert_eq!(eval(&mut evaluator, "((10 - 2) * 3) / (4 + 2)"), 4.0);
    }

    #[test]
    fn test_exact_decimal_subtraction() {
        let mut evaluator = Evaluator::new();
        assert_eq!(eval(&mut evaluator, "7464.36 - 7391.21"), 73.15);
    }

    #[test]
    fn test_power_overflow_is_a_runtime_failure() {
        let mut evaluator = Evaluator::new();
        assert!(matches!(
            evaluator.evaluate("128 ^ 45"),
            Err(EvalError::Overflow { .. })
        ));
        assert_eq!(eval(&mut evaluator, "45 ^ 16"), 45_f64.powf(16.0));
    }

    #[test]
    fn test_answer_tracks_last_result_and_is_idempotent() {
        let mut evaluator = Evaluator::new();
        eval(&mut evaluator, "6 * 7");
        assert_eq!(evaluator.variable("answer"), Some(42.0));
        assert_eq!(eval(&mut evaluator, "answer"), 42.0);
        assert_eq!(eval(&mut evaluator, "answer"), 42.0);
        assert_eq!(evaluator.variable("answer"), Some(42.0));
    }

    #[test]
    fn test_reserved_constants() {
        let mut evaluator = Evaluator::new();
        assert_eq!(eval(&mut evaluator, "pi"), std::f64::consts::PI);
        assert_eq!(eval(&mut evaluator, "e"), std::f64::consts::E);
        assert_eq!(eval(&mut evaluator, "14pi"), 14.0 * std::f64::consts::PI);
    }

    #[test]
    fn test_variable_lifecycle() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate("x = 800").unwrap(), Some(800.0));
        assert_eq!(evaluator.variable("x"), Some(800.0));

        // Trailing-equals clear: no value, variable removed.
        assert_eq!(evaluator.evaluate("x = ").unwrap(), None);
        assert_eq!(evaluator.variable("x"), None);
        assert!(matches!(
            evaluator.evaluate("x"),
            Err(EvalError::Parse { .. })
        ));
    }

    #[test]
    fn test_assignment_is_case_insensitive_and_usable() {
        let mut evaluator = Evaluator::new();
        eval(&mut evaluator, "Rate = 0.25");
        assert_eq!(eval(&mut evaluator, "rate * 4"), 1.0);
        assert_eq!(eval(&mut evaluator, "RATE * 8"), 2.0);
    }

    #[test]
    fn test_failed_evaluation_leaves_variables_untouched() {
        let mut evaluator = Evaluator::new();
        eval(&mut evaluator, "1 + 1");
        let before: Vec<(String, f64)> = evaluator
            .variables()
            .iter()
            .map(|(n, v)| (n.to_string(), v))
            .collect();

        for bad in [",", "min(,2,3)", "min(1,2,3,4)", "(1,2)", "_x3=33", "y = )"] {
            assert!(evaluator.evaluate(bad).is_err(), "'{}' should fail", bad);
        }

        let mut after: Vec<(String, f64)> = evaluator
            .variables()
            .iter()
            .map(|(n, v)| (n.to_string(), v))
            .collect();
        let mut before = before;
        before.sort_by(|a, b| a.0.cmp(&b.0));
        after.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(before, after);
    }

    #[test]
    fn test_implicit_multiplication_results() {
        let mut evaluator = Evaluator::new();
        assert_eq!(eval(&mut evaluator, "(3)(5)"), 15.0);
        assert_eq!(eval(&mut evaluator, "sqrt(16)(5)"), 20.0);
        assert_eq!(eval(&mut evaluator, "(3)-15"), -12.0);
        assert_eq!(eval(&mut evaluator, "2(3+1)"), 8.0);
        assert_eq!(eval(&mut evaluator, "6/2(1+2)"), 9.0);
    }

    #[test]
    fn test_builtin_functions() {
        let mut evaluator = Evaluator::new();
        assert_eq!(eval(&mut evaluator, "sqrt(16)"), 4.0);
        assert_eq!(eval(&mut evaluator, "cbrt(27)"), 3.0);
        assert_eq!(eval(&mut evaluator, "abs(0-5)"), 5.0);
        assert_eq!(eval(&mut evaluator, "min(3, 4)"), 3.0);
        assert_eq!(eval(&mut evaluator, "max(3, 4)"), 4.0);
        assert_eq!(eval(&mut evaluator, "pow(2, 8)"), 256.0);
        assert_eq!(eval(&mut evaluator, "floor(1.9)"), 1.0);
        assert_eq!(eval(&mut evaluator, "ceiling(1.1)"), 2.0);
        assert_eq!(eval(&mut evaluator, "round(2.5)"), 3.0);
        assert_eq!(eval(&mut evaluator, "truncate(2.9)"), 2.0);
        assert_eq!(eval(&mut evaluator, "sin(0)"), 0.0);
        assert_eq!(eval(&mut evaluator, "cos(0)"), 1.0);
        assert_eq!(eval(&mut evaluator, "atan2(0, 1)"), 0.0);
        assert_eq!(eval(&mut evaluator, "exp(0)"), 1.0);
        assert_eq!(eval(&mut evaluator, "log(e)"), 1.0);
        assert_eq!(eval(&mut evaluator, "log10(1000)"), 3.0);
        assert_eq!(eval(&mut evaluator, "log2(8)"), 3.0);
    }

    #[test]
    fn test_nested_function_calls() {
        let mut evaluator = Evaluator::new();
        assert_eq!(eval(&mut evaluator, "max(min(1,2),3)"), 3.0);
        assert_eq!(eval(&mut evaluator, "sqrt(sqrt(81))"), 3.0);
        assert_eq!(eval(&mut evaluator, "min(sqrt(16), max(2, 3))"), 3.0);
    }

    #[test]
    fn test_unit_conversion_expressions() {
        let mut evaluator = Evaluator::new();
        assert_eq!(eval(&mut evaluator, "1 [ft->in]"), 12.0);
        assert_eq!(eval(&mut evaluator, "100 [c->f]"), 212.0);
        assert_eq!(eval(&mut evaluator, "36 [kph->mps]"), 10.0);
        assert_eq!(eval(&mut evaluator, "1 [ft->in] [in->ft]"), 1.0);
        // The tag applies to the value produced so far.
        assert_eq!(eval(&mut evaluator, "(1 + 1) [ft->in]"), 24.0);
    }

    #[test]
    fn test_register_function_and_collisions() {
        let mut evaluator = Evaluator::new();
        evaluator
            .register_function("double", 1, |args| match args {
                [x] => Ok(PreciseNumber::from_f64(x.float() * 2.0)),
                _ => Err(EvalError::parse("double", "expects 1 operand")),
            })
            .unwrap();
        assert_eq!(eval(&mut evaluator, "double(21)"), 42.0);
        assert_eq!(eval(&mut evaluator, "DOUBLE(1) + 1"), 3.0);

        assert!(matches!(
            evaluator.register_function("double", 1, |_| Ok(PreciseNumber::from_f64(0.0))),
            Err(EvalError::Name { .. })
        ));
        assert!(matches!(
            evaluator.register_function("sqrt", 1, |_| Ok(PreciseNumber::from_f64(0.0))),
            Err(EvalError::Name { .. })
        ));
        assert!(matches!(
            evaluator.register_function("_bad", 1, |_| Ok(PreciseNumber::from_f64(0.0))),
            Err(EvalError::Name { .. })
        ));
    }

    #[test]
    fn test_zero_arity_registered_function() {
        let mut evaluator = Evaluator::new();
        evaluator
            .register_function("two", 0, |_| Ok(PreciseNumber::from_f64(2.0)))
            .unwrap();
        assert_eq!(eval(&mut evaluator, "two() + 1"), 3.0);
    }

    #[test]
    fn test_set_variable_validation() {
        let mut evaluator = Evaluator::new();
        evaluator.set_variable("budget", 1200.0).unwrap();
        assert_eq!(eval(&mut evaluator, "budget / 12"), 100.0);

        assert!(matches!(
            evaluator.set_variable("_x3", 1.0),
            Err(EvalError::Name { .. })
        ));
        assert!(matches!(
            evaluator.set_variable("sqrt", 1.0),
            Err(EvalError::Name { .. })
        ));
    }

    #[test]
    fn test_function_names_sorted() {
        let evaluator = Evaluator::new();
        let names = evaluator.function_names();
        assert!(names.windows(2).all(|w| w[0] < w[1]));
        assert!(names.contains(&"sqrt".to_string()));
        assert!(names.contains(&"atan2".to_string()));
    }

    #[test]
    fn test_malformed_expressions_fail() {
        let mut evaluator = Evaluator::new();
        for bad in [
            "", "   ", "2 +", "* 5", "2 3", "(2)(pi)pi", "()", "2 =", "5 @ 3",
        ] {
            assert!(evaluator.evaluate(bad).is_err(), "'{}' should fail", bad);
        }
    }

    #[test]
    fn test_division_by_zero_propagates_infinity() {
        let mut evaluator = Evaluator::new();
        assert_eq!(eval(&mut evaluator, "1 / 0"), f64::INFINITY);
        assert!(eval(&mut evaluator, "0 / 0").is_nan());
        // NaN flows through further arithmetic unchanged.
        assert!(eval(&mut evaluator, "0 / 0 - 5").is_nan());
        assert!(eval(&mut evaluator, "(0 / 0) * 2").is_nan());
    }

    #[test]
    fn test_negative_exponents() {
        let mut evaluator = Evaluator::new();
        assert_eq!(eval(&mut evaluator, "2 ^ -3"), 0.125);
    }

    #[test]
    fn test_assignment_result_is_also_the_answer() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate("x = 6 * 7").unwrap(), Some(42.0));
        assert_eq!(evaluator.variable("x"), Some(42.0));
        assert_eq!(evaluator.variable("answer"), Some(42.0));
    }

    #[test]
    fn test_clearing_unknown_variable_is_silent() {
        let mut evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate("ghost = ").unwrap(), None);
    }

    #[test]
    fn test_reset_variables() {
        let mut evaluator = Evaluator::new();
        eval(&mut evaluator, "x = 1");
        evaluator.reset_variables();
        assert_eq!(evaluator.variable("x"), None);
        assert_eq!(evaluator.variable("answer"), Some(0.0));
    }
}
