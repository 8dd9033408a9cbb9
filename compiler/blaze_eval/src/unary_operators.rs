//! Unary operator implementations for the evaluator.
//!
//! For `++` and `--` this computes the updated value only; resolving the
//! target identifier and writing the result back is the interpreter's job.

use blaze_ir::UnaryOp;

use crate::errors::{type_error, EvalError, EvalResult};
use crate::value::Value;

/// Evaluate `op value`.
pub fn evaluate_unary(value: &Value, op: UnaryOp) -> EvalResult {
    match (value, op) {
        (_, UnaryOp::Not) => Ok(Value::Bool(!value.is_truthy())),

        (Value::Number(n), UnaryOp::Plus) => Ok(Value::Number(*n)),
        (Value::Number(n), UnaryOp::Neg) => Ok(Value::Number(n.negate())),

        (Value::Number(n), UnaryOp::PreIncrement | UnaryOp::PostIncrement) => {
            Ok(Value::Number(n.step(1.0)))
        }
        (Value::Number(n), UnaryOp::PreDecrement | UnaryOp::PostDecrement) => {
            Ok(Value::Number(n.step(-1.0)))
        }

        _ => Err(invalid_unary_op(value, op)),
    }
}

#[cold]
fn invalid_unary_op(value: &Value, op: UnaryOp) -> EvalError {
    type_error(format!(
        "unary `{}` requires a number, got {}",
        op.as_symbol(),
        value.type_name()
    ))
}
