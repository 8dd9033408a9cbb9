//! Blaze Eval - the runtime core of the Blaze scripting language.
//!
//! This crate walks a `blaze_ir` syntax tree and produces runtime values.
//!
//! # Architecture
//!
//! Leaves first:
//! - [`Value`]: tagged runtime values with reference-counted heap payloads
//!   and an explicit [`Value::deep_copy`] for ownership boundaries
//! - [`AssocTable`]: fixed-capacity open-addressing table used for scope
//!   bindings and object properties
//! - [`Environment`]: chained lexical scopes shared through `Rc` handles, so
//!   closures see later mutation of the scope they captured
//! - [`Interpreter`]: the recursive evaluator, with operators in
//!   [`evaluate_binary`] / [`evaluate_unary`] and loop/call helpers in
//!   [`exec`]
//!
//! Native functions are supplied by the embedder through a
//! [`NativeRegistry`] and reached through ordinary identifier lookup.
//!
//! Every error is fatal: evaluation stops at the first [`EvalError`], which
//! records the source line that was being evaluated.

mod config;
mod environment;
pub mod errors;
pub mod exec;
pub mod interpreter;
mod natives;
mod operators;
mod print_handler;
mod stack;
mod table;
mod unary_operators;
mod value;

pub use config::EvalConfig;
pub use environment::{AssignError, Environment, LocalScope, ScopeGuard, WeakEnvironment};
pub use errors::{ControlAction, EvalError, EvalErrorKind, EvalResult, ExecResult};
pub use interpreter::{Interpreter, InterpreterBuilder};
pub use natives::{NativeFn, NativeFunction, NativeRegistry};
pub use operators::evaluate_binary;
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use stack::ensure_sufficient_stack;
pub use table::{AssocTable, DeepCopy, SetOutcome, TableFull};
pub use unary_operators::evaluate_unary;
pub use value::{format_g, Binding, Number, ObjectTable, UserFunction, Value};

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
