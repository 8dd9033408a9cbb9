//! Binary operator implementations for the evaluator.
//!
//! Dispatch is by the runtime kinds of both operands. Logical operators
//! coerce both sides to booleans and never short-circuit: both operands
//! have already been evaluated by the time they get here.

use blaze_ir::BinaryOp;

use crate::errors::{division_by_zero, invalid_operands, type_error, EvalResult};
use crate::value::{Number, Value};

/// Evaluate `left op right`.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    if op.is_logical() {
        return Ok(eval_logical(left.is_truthy(), right.is_truthy(), op));
    }

    match (left, right) {
        (Value::Number(a), Value::Number(b)) => eval_numeric_binary(*a, *b, op),
        (Value::Number(a), Value::Bool(b)) => eval_numeric_binary(*a, Number::from_bool(*b), op),
        (Value::Bool(a), Value::Number(b)) => eval_numeric_binary(Number::from_bool(*a), *b, op),
        (Value::Str(_), _) | (_, Value::Str(_)) => eval_string_binary(left, right, op),
        (Value::Null, Value::Null) => Ok(Value::Bool(op.is_equality())),
        _ => Err(invalid_operands(op, left, right)),
    }
}

fn eval_logical(a: bool, b: bool, op: BinaryOp) -> Value {
    match op {
        BinaryOp::And => Value::Bool(a && b),
        _ => Value::Bool(a || b),
    }
}

/// Binary operations on numbers (booleans already widened to 0/1).
#[allow(clippy::float_cmp, reason = "numeric equality is exact")]
fn eval_numeric_binary(a: Number, b: Number, op: BinaryOp) -> EvalResult {
    let (x, y) = (a.raw(), b.raw());
    let value = match op {
        BinaryOp::Add => Value::Number(Number::arithmetic(x + y, a, b)),
        BinaryOp::Sub => Value::Number(Number::arithmetic(x - y, a, b)),
        BinaryOp::Mul => Value::Number(Number::arithmetic(x * y, a, b)),
        BinaryOp::Div => {
            if b.is_zero() {
                return Err(division_by_zero());
            }
            Value::Number(Number::arithmetic(x / y, a, b))
        }
        BinaryOp::Mod => {
            if a.is_float() || b.is_float() {
                return Err(type_error(
                    "modulus operator requires integer operands, float given",
                ));
            }
            if b.is_zero() {
                return Err(division_by_zero());
            }
            Value::Number(Number::int(a.as_int().wrapping_rem(b.as_int())))
        }
        BinaryOp::Eq => Value::Bool(x == y),
        BinaryOp::StrictEq => Value::Bool(x == y && a.is_float() == b.is_float()),
        BinaryOp::Lt => Value::Bool(x < y),
        BinaryOp::LtEq => Value::Bool(x <= y),
        BinaryOp::Gt => Value::Bool(x > y),
        BinaryOp::GtEq => Value::Bool(x >= y),
        BinaryOp::And | BinaryOp::Or => eval_logical(a.is_one(), b.is_one(), op),
    };
    Ok(value)
}

/// Binary operations where at least one operand is a string.
#[allow(clippy::float_cmp, reason = "numeric equality is exact")]
fn eval_string_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match (op, left, right) {
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::string(format!("{a}{b}"))),
        (BinaryOp::Add, Value::Str(s), Value::Number(n)) => Ok(Value::string(format!("{s}{n}"))),
        (BinaryOp::Add, Value::Number(n), Value::Str(s)) => Ok(Value::string(format!("{n}{s}"))),

        (BinaryOp::Eq, Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a == b)),
        (BinaryOp::Eq, Value::Str(s), Value::Number(n))
        | (BinaryOp::Eq, Value::Number(n), Value::Str(s)) => {
            Ok(Value::Bool(parse_number(s).is_some_and(|p| p.raw() == n.raw())))
        }

        (BinaryOp::StrictEq, Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a == b)),
        (BinaryOp::StrictEq, _, _) => Ok(Value::Bool(false)),

        _ => Err(invalid_operands(op, left, right)),
    }
}

/// Parse string text as a number: float when it contains a decimal point,
/// integer otherwise.
fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if text.contains('.') {
        text.parse::<f64>().ok().map(Number::float)
    } else {
        text.parse::<i64>().ok().map(Number::int)
    }
}
