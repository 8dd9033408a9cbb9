//! Evaluation errors and control-flow signals.
//!
//! Every runtime error in Blaze is fatal. `EvalErrorKind` is the typed
//! taxonomy; `EvalError` pairs a kind with the source line that was being
//! evaluated when it was raised. The factory functions below are the
//! canonical way to build errors; the interpreter attaches the line.
//!
//! `break`, `continue` and `return` are not errors, but they travel the same
//! way: as the `Err` side of an [`ExecResult`], wrapped in [`ControlAction`],
//! until the construct that owns them consumes them.

use std::fmt;

use blaze_ir::{BinaryOp, UnaryOp};

use crate::value::Value;

/// Result of evaluation at the driver boundary.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Result of evaluating a single node: a value, an error, or a control signal.
pub type ExecResult<T = Value> = Result<T, ControlAction>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("undefined identifier '{name}'")]
    UndefinedIdentifier { name: String },

    #[error("cannot re-assign a value to constant '{name}'")]
    ConstReassignment { name: String },

    #[error("cannot assign a value to a non-modifiable expression ({target})")]
    InvalidAssignmentTarget { target: &'static str },

    #[error("type error: {message}")]
    TypeError { message: String },

    #[error("result of division by zero is undefined")]
    DivisionByZero,

    #[error("function '{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("{type_name} is not callable")]
    NotCallable { type_name: &'static str },

    #[error("undefined property '{property}'")]
    UndefinedProperty { property: String },

    #[error("operand of `{op}` must be an identifier")]
    InvalidLvalue { op: &'static str },

    #[error("loop bound must not be negative, got {bound}")]
    InvalidBound { bound: i64 },

    #[error("binding table overflow: capacity of {capacity} entries exceeded")]
    TableOverflow { capacity: usize },

    #[error("this AST node is not supported: {node}")]
    UnsupportedNode { node: &'static str },

    #[error("invalid operands to `{op}`: {left} and {right}")]
    InvalidOperands {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("maximum call depth exceeded (limit: {limit})")]
    StackOverflow { limit: usize },

    /// Raised by a native function.
    #[error("{message}")]
    Native { message: String },
}

/// A fatal evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Source line active when the error was raised. `None` until the
    /// interpreter attaches it.
    pub line: Option<u32>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind, line: None }
    }

    /// Attach `line` unless a more precise line is already recorded.
    #[must_use]
    pub fn at_line(mut self, line: u32) -> Self {
        self.line.get_or_insert(line);
        self
    }

    /// Error message without the line suffix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} at line {line}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::new(kind)
    }
}

/// Non-local exits raised while evaluating a node.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    /// A fatal error unwinding to the driver.
    Error(EvalError),
    /// `break`: consumed by the nearest enclosing loop.
    Break,
    /// `continue`: consumed by the nearest enclosing loop.
    Continue,
    /// `return`: consumed by the enclosing function call.
    Return(Value),
}

impl ControlAction {
    /// Attach `line` to a carried error that has none yet.
    #[must_use]
    pub fn at_line(self, line: u32) -> Self {
        match self {
            ControlAction::Error(e) => ControlAction::Error(e.at_line(line)),
            other => other,
        }
    }

    /// Returns `true` for `break` and `continue`.
    pub fn is_loop_signal(&self) -> bool {
        matches!(self, ControlAction::Break | ControlAction::Continue)
    }
}

impl From<EvalError> for ControlAction {
    fn from(e: EvalError) -> Self {
        ControlAction::Error(e)
    }
}

impl From<EvalErrorKind> for ControlAction {
    fn from(kind: EvalErrorKind) -> Self {
        ControlAction::Error(EvalError::new(kind))
    }
}

// Variable errors

pub fn undefined_identifier(name: &str) -> EvalError {
    EvalErrorKind::UndefinedIdentifier {
        name: name.to_string(),
    }
    .into()
}

pub fn const_reassignment(name: &str) -> EvalError {
    EvalErrorKind::ConstReassignment {
        name: name.to_string(),
    }
    .into()
}

pub fn invalid_assignment_target(target: &'static str) -> EvalError {
    EvalErrorKind::InvalidAssignmentTarget { target }.into()
}

pub fn invalid_lvalue(op: UnaryOp) -> EvalError {
    EvalErrorKind::InvalidLvalue {
        op: op.as_symbol(),
    }
    .into()
}

// Operator errors

pub fn type_error(message: impl Into<String>) -> EvalError {
    EvalErrorKind::TypeError {
        message: message.into(),
    }
    .into()
}

pub fn division_by_zero() -> EvalError {
    EvalErrorKind::DivisionByZero.into()
}

pub fn invalid_operands(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalErrorKind::InvalidOperands {
        op: op.as_symbol(),
        left: left.type_name(),
        right: right.type_name(),
    }
    .into()
}

// Call errors

pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    }
    .into()
}

pub fn not_callable(value: &Value) -> EvalError {
    EvalErrorKind::NotCallable {
        type_name: value.type_name(),
    }
    .into()
}

pub fn stack_overflow(limit: usize) -> EvalError {
    EvalErrorKind::StackOverflow { limit }.into()
}

/// Error raised from inside a native function.
pub fn native_error(message: impl Into<String>) -> EvalError {
    EvalErrorKind::Native {
        message: message.into(),
    }
    .into()
}

// Object errors

pub fn undefined_property(property: &str) -> EvalError {
    EvalErrorKind::UndefinedProperty {
        property: property.to_string(),
    }
    .into()
}

// Loop errors

pub fn invalid_bound(bound: i64) -> EvalError {
    EvalErrorKind::InvalidBound { bound }.into()
}

// Structural errors

pub fn table_overflow(capacity: usize) -> EvalError {
    EvalErrorKind::TableOverflow { capacity }.into()
}

pub fn unsupported_node(node: &'static str) -> EvalError {
    EvalErrorKind::UnsupportedNode { node }.into()
}
