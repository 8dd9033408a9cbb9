//! Execution helpers for the Blaze interpreter.
//!
//! - `expr`: identifiers, member access, object literal properties
//! - `call`: arity checks and parameter binding
//! - `control`: loop status, loop bounds, stray loop signals
//!
//! These modules hold the node-independent parts of evaluation that the
//! [`Interpreter`](crate::Interpreter) delegates to.

pub mod call;
pub mod control;
pub mod expr;
