use log::debug;

use crate::engine::evaluator::FunctionRegistry;
use crate::engine::{ExprNode, Operator, PreciseNumber, VariableStore};
use crate::error::EvalError;
use crate::units::ConversionTable;

/// Result of a parse: the postfix node queue plus the assignment action
/// detected ahead of the expression, if any.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub nodes: Vec<ExprNode>,
    pub assignment: Option<Assignment>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Assignment {
    /// `name = <expression>`: store the result under `name`.
    Set(String),
    /// `name =` with an empty right-hand side: delete `name`.
    Clear(String),
}

/// Kind of the previous significant token, driving the unary-minus and
/// implicit-multiplication adjacency rules.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Prev {
    None,
    Number,
    Operator,
    Comma,
    GroupOpen,
    GroupClose,
    Variable,
    FunctionName,
    Convert,
}

/// Symbol stack entry of the shunting-yard pass.
enum Symbol {
    Operator(Operator),
    /// `function_owned` marks the parenthesis that opens a function's
    /// argument list; a comma is valid only directly inside such a group.
    GroupOpen { function_owned: bool },
    Function { name: String, arity: usize, body: crate::engine::MathFunction },
}

/// Single-pass, left-to-right tokenizer and shunting-yard parser. The
/// whole context is stack-allocated per call; nothing survives between
/// parses except the variable store and function registry it borrows.
pub(crate) struct Parser<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
    output: Vec<ExprNode>,
    stack: Vec<Symbol>,
    function_depth: usize,
    group_depth: usize,
    prev: Prev,
    variables: &'a VariableStore,
    functions: &'a FunctionRegistry,
    conversions: &'a ConversionTable,
}

impl<'a> Parser<'a> {
    pub(crate) fn parse(
        text: &'a str,
        variables: &'a VariableStore,
        functions: &'a FunctionRegistry,
        conversions: &'a ConversionTable,
    ) -> Result<Parsed, EvalError> {
        let mut assignment = None;
        let mut rhs = text;
        if let Some((target, rest)) = split_assignment(text) {
            let key = target.to_lowercase();
            if !functions.contains_key(&key) {
                if rest.trim().is_empty() {
                    debug!("variable-clear request for '{}'", key);
                    return Ok(Parsed {
                        nodes: Vec::new(),
                        assignment: Some(Assignment::Clear(key)),
                    });
                }
                assignment = Some(Assignment::Set(key));
                rhs = rest;
            }
        }

        let mut parser = Parser {
            text,
            chars: rhs.chars().collect(),
            pos: 0,
            output: Vec::new(),
            stack: Vec::new(),
            function_depth: 0,
            group_depth: 0,
            prev: Prev::None,
            variables,
            functions,
            conversions,
        };
        parser.run()?;
        debug!("parsed '{}' into {} postfix nodes", text, parser.output.len());
        Ok(Parsed {
            nodes: parser.output,
            assignment,
        })
    }

    fn run(&mut self) -> Result<(), EvalError> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else if c.is_ascii_digit() || c == '.' || (c == '-' && self.minus_starts_number()) {
                self.read_number()?;
            } else if Operator::try_from(c).is_ok() {
                self.read_operator();
            } else if c == ',' {
                self.read_comma()?;
            } else if c == '(' {
                self.read_group_open()?;
            } else if c == ')' {
                self.read_group_close()?;
            } else if c.is_ascii_alphabetic() {
                self.read_identifier()?;
            } else if c == '[' {
                self.read_conversion_tag()?;
            } else {
                return Err(self.error(format!("invalid character '{}'", c)));
            }
        }
        self.drain()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_non_whitespace(&self) -> Option<char> {
        self.chars[self.pos..]
            .iter()
            .copied()
            .find(|c| !c.is_whitespace())
    }

    fn error(&self, message: impl Into<String>) -> EvalError {
        EvalError::parse(self.text, message)
    }

    /// A `-` starts a number literal only when the previous significant
    /// token is nothing, a group open or another operator; in every other
    /// position it is binary subtraction.
    fn minus_starts_number(&self) -> bool {
        matches!(self.prev, Prev::None | Prev::GroupOpen | Prev::Operator)
            && matches!(
                self.chars.get(self.pos + 1),
                Some(c) if c.is_ascii_digit() || *c == '.'
            )
    }

    /// Synthesizes the implicit multiplication the grammar allows between
    /// certain adjacent closed terms.
    fn inject_multiplication(&mut self) {
        debug!("implicit multiplication at position {}", self.pos);
        self.push_operator(Operator::Multiply);
    }

    fn push_operator(&mut self, op: Operator) {
        loop {
            match self.stack.last() {
                Some(Symbol::Operator(top)) if top.precedence() >= op.precedence() => {
                    let top = *top;
                    self.stack.pop();
                    self.output.push(ExprNode::Operator(top));
                }
                _ => break,
            }
        }
        self.stack.push(Symbol::Operator(op));
    }

    fn read_number(&mut self) -> Result<(), EvalError> {
        if self.prev == Prev::GroupClose {
            // group-then-number and function-call-then-number adjacency;
            // a negative sign never reaches here (it parses as binary
            // subtraction after a closing parenthesis).
            self.inject_multiplication();
        }
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        let value = PreciseNumber::parse(&literal)
            .ok_or_else(|| self.error(format!("invalid number '{}'", literal)))?;
        self.output.push(ExprNode::Number(value));
        self.prev = Prev::Number;
        Ok(())
    }

    fn read_operator(&mut self) {
        // Validity is settled on the operand stack: a misplaced operator
        // runs the stack dry during evaluation.
        let op = match self.peek().and_then(|c| Operator::try_from(c).ok()) {
            Some(op) => op,
            None => return,
        };
        self.pos += 1;
        self.push_operator(op);
        self.prev = Prev::Operator;
    }

    fn read_comma(&mut self) -> Result<(), EvalError> {
        self.pos += 1;
        if self.function_depth == 0 {
            return Err(self.error("comma outside of a function argument list"));
        }
        if matches!(self.peek_non_whitespace(), Some(')') | Some(',') | None) {
            return Err(self.error("misplaced comma"));
        }
        // Pop pending operators back to the group that owns the comma,
        // which must be a function's argument list.
        loop {
            match self.stack.last() {
                Some(Symbol::Operator(op)) => {
                    let op = *op;
                    self.stack.pop();
                    self.output.push(ExprNode::Operator(op));
                }
                Some(Symbol::GroupOpen { function_owned: true }) => break,
                _ => return Err(self.error("comma outside of a function argument list")),
            }
        }
        self.prev = Prev::Comma;
        Ok(())
    }

    fn read_group_open(&mut self) -> Result<(), EvalError> {
        if matches!(self.prev, Prev::Number | Prev::GroupClose | Prev::Variable) {
            self.inject_multiplication();
        }
        let function_owned = self.prev == Prev::FunctionName;
        self.pos += 1;
        if self.peek_non_whitespace() == Some(',') {
            return Err(self.error("misplaced comma"));
        }
        self.stack.push(Symbol::GroupOpen { function_owned });
        self.group_depth += 1;
        self.prev = Prev::GroupOpen;
        Ok(())
    }

    fn read_group_close(&mut self) -> Result<(), EvalError> {
        if self.group_depth == 0 {
            return Err(self.error("unbalanced parentheses"));
        }
        self.pos += 1;
        loop {
            match self.stack.pop() {
                Some(Symbol::Operator(op)) => self.output.push(ExprNode::Operator(op)),
                Some(Symbol::GroupOpen { function_owned }) => {
                    self.group_depth -= 1;
                    if function_owned {
                        match self.stack.pop() {
                            Some(Symbol::Function { name, arity, body }) => {
                                self.function_depth -= 1;
                                self.output.push(ExprNode::Function { name, arity, body });
                            }
                            _ => return Err(self.error("mismatched function call")),
                        }
                    }
                    self.prev = Prev::GroupClose;
                    return Ok(());
                }
                Some(Symbol::Function { .. }) | None => {
                    return Err(self.error("unbalanced parentheses"));
                }
            }
        }
    }

    fn read_identifier(&mut self) -> Result<(), EvalError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        let key = name.to_lowercase();

        if let Some((arity, body)) = self.functions.get(&key).map(|e| (e.arity, e.body.clone())) {
            if matches!(self.prev, Prev::Number | Prev::GroupClose) {
                // number-then-function-call and group-then-function-call.
                self.inject_multiplication();
            }
            let found = self.argument_count_ahead(&name)?;
            if found != arity {
                return Err(self.error(format!(
                    "function '{}' expects {} argument{}, found {}",
                    name,
                    arity,
                    if arity == 1 { "" } else { "s" },
                    found
                )));
            }
            self.stack.push(Symbol::Function {
                name: key,
                arity,
                body,
            });
            self.function_depth += 1;
            self.prev = Prev::FunctionName;
            return Ok(());
        }

        if self.prev == Prev::Number {
            // number-then-variable: `14pi` is 14 * pi. The reverse never
            // happens lexically, `answer52` scans as one identifier.
            self.inject_multiplication();
        }
        match self.variables.get(&key) {
            Some(value) => {
                self.output.push(ExprNode::Number(PreciseNumber::from_f64(value)));
                self.prev = Prev::Variable;
                Ok(())
            }
            None => Err(self.error(format!("unknown identifier '{}'", name))),
        }
    }

    /// Looks ahead in the unconsumed remainder for the function's
    /// argument list and counts its top-level commas. The remainder is
    /// only inspected, never consumed.
    fn argument_count_ahead(&self, name: &str) -> Result<usize, EvalError> {
        let mut idx = self.pos;
        while matches!(self.chars.get(idx), Some(c) if c.is_whitespace()) {
            idx += 1;
        }
        if self.chars.get(idx) != Some(&'(') {
            return Err(self.error(format!(
                "function '{}' must be followed by an argument list",
                name
            )));
        }
        let mut depth = 0usize;
        let mut commas = 0usize;
        let mut has_content = false;
        for c in &self.chars[idx..] {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(if has_content { commas + 1 } else { 0 });
                    }
                }
                ',' if depth == 1 => commas += 1,
                c if !c.is_whitespace() && *c != ',' => has_content = true,
                _ => {}
            }
        }
        Err(self.error("unbalanced parentheses"))
    }

    fn read_conversion_tag(&mut self) -> Result<(), EvalError> {
        self.pos += 1;
        let mut tag = String::new();
        loop {
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(c) if c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || c == '>' => {
                    tag.push(c);
                    self.pos += 1;
                }
                Some(c) => {
                    return Err(self.error(format!("invalid character '{}' in conversion tag", c)));
                }
                None => return Err(self.error("unterminated conversion tag")),
            }
        }
        let key: String = tag.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase();
        match self.conversions.get(&key) {
            Some(conversion) => {
                self.output.push(ExprNode::Convert(conversion.clone()));
                self.prev = Prev::Convert;
                Ok(())
            }
            None => Err(self.error(format!("unknown conversion '[{}]'", key))),
        }
    }

    fn drain(&mut self) -> Result<(), EvalError> {
        while let Some(symbol) = self.stack.pop() {
            match symbol {
                Symbol::Operator(op) => self.output.push(ExprNode::Operator(op)),
                Symbol::GroupOpen { .. } => return Err(self.error("unbalanced parentheses")),
                Symbol::Function { name, .. } => {
                    return Err(self.error(format!("function '{}' is missing its argument list", name)));
                }
            }
        }
        Ok(())
    }
}

/// Assignment detection without a regex: a top-level `=` reached before
/// any parenthesis or bracket splits the input, provided the left side is
/// a valid identifier. Anything else falls through to ordinary scanning
/// (where a stray `=` is an invalid character).
fn split_assignment(text: &str) -> Option<(&str, &str)> {
    for (idx, c) in text.char_indices() {
        match c {
            '(' | '[' => return None,
            '=' => {
                let lhs = text[..idx].trim();
                if VariableStore::is_valid_name(lhs) {
                    return Some((lhs, &text[idx + 1..]));
                }
                return None;
            }
            _ => {}
        }
    }
    None
}
