//! Expression helpers: identifiers, member access and object properties.

use crate::environment::Environment;
use crate::errors::{type_error, undefined_identifier, undefined_property, EvalError, EvalResult};
use crate::value::{Binding, Value};

/// Value bound to `name`.
pub fn eval_ident(name: &str, env: &Environment) -> EvalResult {
    env.lookup(name).ok_or_else(|| undefined_identifier(name))
}

/// Read property `key` of `object`.
pub fn get_property(object: &Value, key: &str) -> EvalResult {
    match object {
        Value::Object(table) => table
            .get(key)
            .map(|binding| binding.value.clone())
            .ok_or_else(|| undefined_property(key)),
        other => Err(type_error(format!(
            "cannot access property '{key}' of {}",
            other.type_name()
        ))),
    }
}

/// Text of a computed member key, which must be a string.
pub fn computed_key(key: &Value) -> Result<&str, EvalError> {
    key.as_str().ok_or_else(|| {
        type_error(format!(
            "computed property key must be a string, got {}",
            key.type_name()
        ))
    })
}

/// Property for shorthand `{ name }`: an independent copy of the binding
/// `name` resolves to, const-ness included.
pub fn shorthand_property(name: &str, env: &Environment) -> Result<Binding, EvalError> {
    let binding = env.resolve(name).ok_or_else(|| undefined_identifier(name))?;
    Ok(Binding::new(name, binding.value.deep_copy(), binding.is_const))
}
