//! Function call helpers.

use crate::environment::Environment;
use crate::errors::{arity_mismatch, EvalError};
use crate::value::{UserFunction, Value};

/// Check that `args` has exactly one value per parameter.
pub fn check_arity(func: &UserFunction, args: &[Value]) -> Result<(), EvalError> {
    if args.len() == func.arity() {
        Ok(())
    } else {
        Err(arity_mismatch(&func.name, func.arity(), args.len()))
    }
}

/// Bind each parameter in `scope` as a const deep copy of its argument.
///
/// Assumes [`check_arity`] has passed.
pub fn bind_parameters(
    scope: &Environment,
    func: &UserFunction,
    args: &[Value],
) -> Result<(), EvalError> {
    for (param, arg) in func.params.iter().zip(args) {
        scope.declare(param, arg.deep_copy(), true)?;
    }
    Ok(())
}
