//! Native functions supplied by the embedder.
//!
//! A native is a Rust closure reached through ordinary identifier lookup:
//! [`NativeRegistry::install`] declares each one as a const binding in the
//! global environment, and a call hands it the evaluated arguments plus the
//! caller's environment.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::environment::Environment;
use crate::errors::{EvalError, EvalResult};
use crate::print_handler::SharedPrintHandler;
use crate::value::Value;

/// Signature of a native callable.
pub type NativeFn = Rc<dyn Fn(&[Value], &Environment) -> EvalResult>;

/// A named native callable.
#[derive(Clone)]
pub struct NativeFunction {
    name: Rc<str>,
    func: NativeFn,
}

impl NativeFunction {
    pub fn new(
        name: &str,
        func: impl Fn(&[Value], &Environment) -> EvalResult + 'static,
    ) -> Self {
        NativeFunction {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value], env: &Environment) -> EvalResult {
        (self.func)(args, env)
    }

    /// Returns `true` if both handles wrap the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// Name-to-callable table of natives to install into an interpreter.
#[derive(Clone, Default)]
pub struct NativeRegistry {
    functions: FxHashMap<String, NativeFunction>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `print` and `println`, both writing to `handler`.
    pub fn with_print_natives(handler: &SharedPrintHandler) -> Self {
        let mut registry = Self::new();
        registry.register_print_natives(handler);
        registry
    }

    /// Add `print` and `println`.
    ///
    /// Arguments are formatted with `Display` and joined with single spaces.
    pub fn register_print_natives(&mut self, handler: &SharedPrintHandler) {
        let out = SharedPrintHandler::clone(handler);
        self.register("print", move |args, _| {
            out.print(&join_args(args));
            Ok(Value::Null)
        });
        let out = SharedPrintHandler::clone(handler);
        self.register("println", move |args, _| {
            out.println(&join_args(args));
            Ok(Value::Null)
        });
    }

    /// Add or replace the native called `name`.
    pub fn register(
        &mut self,
        name: &str,
        func: impl Fn(&[Value], &Environment) -> EvalResult + 'static,
    ) {
        if self
            .functions
            .insert(name.to_string(), NativeFunction::new(name, func))
            .is_some()
        {
            tracing::debug!(name, "replacing registered native");
        }
    }

    /// Move every native of `other` into this registry, replacing same-named ones.
    pub fn merge(&mut self, other: NativeRegistry) {
        self.functions.extend(other.functions);
    }

    pub fn get(&self, name: &str) -> Option<&NativeFunction> {
        self.functions.get(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Declare every native as a const binding in `env`.
    pub fn install(&self, env: &Environment) -> Result<(), EvalError> {
        for name in self.names() {
            if let Some(native) = self.functions.get(name) {
                env.declare(name, Value::Native(native.clone()), true)?;
            }
        }
        tracing::debug!(count = self.len(), "installed natives");
        Ok(())
    }
}

impl fmt::Debug for NativeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

fn join_args(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
