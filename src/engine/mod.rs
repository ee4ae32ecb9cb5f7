use std::fmt;

pub mod evaluator;
mod number;
mod parser;
mod variables;

pub use evaluator::{Evaluator, MathFunction};
pub use number::PreciseNumber;
pub use variables::VariableStore;

use crate::error::EvalError;
use crate::units::Conversion;

/// A node of the postfix queue the parser emits. The set is closed apart
/// from `Function`, whose body is an `Arc` closure so caller-registered
/// functions share the representation of the built-ins.
#[derive(Clone)]
pub enum ExprNode {
    Number(PreciseNumber),
    Operator(Operator),
    Convert(Conversion),
    Function {
        name: String,
        arity: usize,
        body: MathFunction,
    },
}

impl ExprNode {
    /// Fixed number of operands this node consumes from the stack.
    pub fn arg_count(&self) -> usize {
        match self {
            ExprNode::Number(_) => 0,
            ExprNode::Operator(_) => 2,
            ExprNode::Convert(_) => 1,
            ExprNode::Function { arity, .. } => *arity,
        }
    }

    /// Evaluates the node against exactly `arg_count()` operands, popped
    /// in push order. The evaluator enforces the operand count before
    /// invocation; a mismatch here is a malformed-expression failure.
    pub fn evaluate(&self, operands: &[PreciseNumber]) -> Result<PreciseNumber, EvalError> {
        match self {
            ExprNode::Number(value) => Ok(*value),
            ExprNode::Operator(op) => match operands {
                [lhs, rhs] => op.apply(*lhs, *rhs),
                _ => Err(operand_mismatch("operator", 2, operands.len())),
            },
            ExprNode::Convert(conversion) => match operands {
                [value] => Ok(conversion.apply(*value)),
                _ => Err(operand_mismatch("conversion", 1, operands.len())),
            },
            ExprNode::Function { name, arity, body } => {
                if operands.len() != *arity {
                    return Err(operand_mismatch(name, *arity, operands.len()));
                }
                body(operands)
            }
        }
    }
}

pub(crate) fn operand_mismatch(what: &str, expected: usize, found: usize) -> EvalError {
    EvalError::parse(
        what,
        format!("expects {} operands, found {}", expected, found),
    )
}

impl fmt::Debug for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Number(value) => f.debug_tuple("Number").field(value).finish(),
            ExprNode::Operator(op) => f.debug_tuple("Operator").field(op).finish(),
            ExprNode::Convert(conversion) => f.debug_tuple("Convert").field(conversion).finish(),
            ExprNode::Function { name, arity, .. } => f
                .debug_struct("Function")
                .field("name", name)
                .field("arity", arity)
                .finish(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl Operator {
    /// Precedence levels, low to high: `+ -` = 1, `* / %` = 2, `^` = 3.
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide | Operator::Modulo => 2,
            Operator::Power => 3,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Modulo => '%',
            Operator::Power => '^',
        }
    }

    /// Addition accumulates in floating point; subtraction,
    /// multiplication, division and modulo prefer exact decimal
    /// intermediates; exponentiation is floating `powf` with an overflow
    /// check against the fixed-point range.
    pub fn apply(
        &self,
        lhs: PreciseNumber,
        rhs: PreciseNumber,
    ) -> Result<PreciseNumber, EvalError> {
        match self {
            Operator::Add => Ok(PreciseNumber::from_f64(lhs.float() + rhs.float())),
            Operator::Subtract => Ok(lhs.subtract(rhs)),
            Operator::Multiply => Ok(lhs.multiply(rhs)),
            Operator::Divide => Ok(lhs.divide(rhs)),
            Operator::Modulo => Ok(lhs.remainder(rhs)),
            Operator::Power => lhs.power(rhs),
        }
    }
}

impl TryFrom<char> for Operator {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '+' => Ok(Operator::Add),
            '-' => Ok(Operator::Subtract),
            '*' => Ok(Operator::Multiply),
            '/' => Ok(Operator::Divide),
            '%' => Ok(Operator::Modulo),
            '^' => Ok(Operator::Power),
            _ => Err(()),
        }
    }
}
