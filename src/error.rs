use thiserror::Error;

/// Error type for expression evaluation.
///
/// Every failure is surfaced to the immediate caller; the engine never
/// retries and never applies partial side effects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Grammatical violation: invalid character, unbalanced parentheses,
    /// misplaced comma, wrong function arity, unknown identifier, invalid
    /// conversion tag, or a malformed operand stack. Deterministic in the
    /// input text.
    #[error("cannot evaluate '{expression}': {message}")]
    Parse { expression: String, message: String },

    /// Runtime numeric failure, distinct from grammar errors: the result
    /// magnitude depends on the operands, not on the expression shape.
    #[error("numeric overflow: {message}")]
    Overflow { message: String },

    /// Naming violation on assignment, variable mutation or function
    /// registration.
    #[error("invalid name '{name}': {message}")]
    Name { name: String, message: String },
}

impl EvalError {
    pub(crate) fn parse(expression: impl Into<String>, message: impl Into<String>) -> Self {
        EvalError::Parse {
            expression: expression.into(),
            message: message.into(),
        }
    }

    pub(crate) fn overflow(message: impl Into<String>) -> Self {
        EvalError::Overflow {
            message: message.into(),
        }
    }

    pub(crate) fn name(name: impl Into<String>, message: impl Into<String>) -> Self {
        EvalError::Name {
            name: name.into(),
            message: message.into(),
        }
    }
}
