//! Control flow helpers: loop status and loop bounds.

use crate::errors::{invalid_bound, type_error, ControlAction, EvalError, ExecResult};
use crate::value::Value;

/// How one evaluation of a loop body ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopStatus {
    /// The body ran to completion.
    Returned,
    /// The body hit `break`.
    Broke,
    /// The body hit `continue`.
    Continued,
}

/// Fold the outcome of a loop body into a [`LoopStatus`].
///
/// `break` and `continue` are consumed here. `return` and errors keep
/// propagating outward.
pub fn to_loop_status(result: ExecResult) -> ExecResult<LoopStatus> {
    match result {
        Ok(_) => Ok(LoopStatus::Returned),
        Err(ControlAction::Break) => Ok(LoopStatus::Broke),
        Err(ControlAction::Continue) => Ok(LoopStatus::Continued),
        Err(other) => Err(other),
    }
}

/// Drop a `break` or `continue` that reached a function body or the
/// program top level without an enclosing loop.
pub fn discard_loop_signal(result: ExecResult) -> ExecResult {
    match result {
        Err(signal) if signal.is_loop_signal() => {
            tracing::trace!(?signal, "discarding loop signal outside of a loop");
            Ok(Value::Null)
        }
        other => other,
    }
}

/// Iteration count of a `loop` statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopBound {
    /// `loop (true)`: runs until `break` or `return`.
    Unbounded,
    /// Exactly this many iterations.
    Times(i64),
}

impl LoopBound {
    /// Returns `true` if iteration `index` (zero-based) should run.
    pub fn allows(self, index: i64) -> bool {
        match self {
            LoopBound::Unbounded => true,
            LoopBound::Times(count) => index < count,
        }
    }
}

/// Interpret the value of a `loop` bound expression.
///
/// Accepts a non-float number (non-negative) or a boolean.
pub fn loop_bound(value: &Value) -> Result<LoopBound, EvalError> {
    match value {
        Value::Bool(true) => Ok(LoopBound::Unbounded),
        Value::Bool(false) => Ok(LoopBound::Times(0)),
        Value::Number(n) if !n.is_float() => {
            let count = n.as_int();
            if count < 0 {
                Err(invalid_bound(count))
            } else {
                Ok(LoopBound::Times(count))
            }
        }
        other => Err(type_error(format!(
            "loop bound must be an integer or a boolean, got {}",
            describe_bound(other)
        ))),
    }
}

fn describe_bound(value: &Value) -> &'static str {
    match value {
        Value::Number(_) => "a float",
        other => other.type_name(),
    }
}
