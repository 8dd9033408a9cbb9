//! `InterpreterBuilder` for creating configured Interpreter instances.

use super::{declare_prelude, Interpreter};
use crate::config::EvalConfig;
use crate::environment::Environment;
use crate::errors::{EvalError, EvalResult};
use crate::natives::NativeRegistry;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::value::Value;

/// Builder for [`Interpreter`].
///
/// Defaults: [`EvalConfig::default`], stdout output, no natives.
#[derive(Default)]
pub struct InterpreterBuilder {
    config: EvalConfig,
    print_handler: Option<SharedPrintHandler>,
    natives: NativeRegistry,
    print_natives: bool,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Where `print` and `println` write. Defaults to stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Natives to install as const globals, merged with any added so far.
    #[must_use]
    pub fn natives(mut self, natives: NativeRegistry) -> Self {
        self.natives.merge(natives);
        self
    }

    /// Add a single native.
    #[must_use]
    pub fn native(
        mut self,
        name: &str,
        func: impl Fn(&[Value], &Environment) -> EvalResult + 'static,
    ) -> Self {
        self.natives.register(name, func);
        self
    }

    /// Install `print` and `println` bound to the print handler.
    #[must_use]
    pub fn with_print_natives(mut self) -> Self {
        self.print_natives = true;
        self
    }

    /// Create the global environment, declare `null`, `true` and `false`,
    /// and install the natives.
    ///
    /// Fails only if these do not fit in the global table.
    pub fn build(self) -> Result<Interpreter, EvalError> {
        let InterpreterBuilder {
            config,
            print_handler,
            mut natives,
            print_natives,
        } = self;

        let print_handler = print_handler.unwrap_or_else(stdout_handler);
        if print_natives {
            natives.register_print_natives(&print_handler);
        }

        let globals = Environment::root(config.global_capacity, config.scope_capacity);
        declare_prelude(&globals)?;
        natives.install(&globals)?;
        tracing::debug!(
            global_capacity = config.global_capacity,
            natives = natives.len(),
            "interpreter built"
        );
        Ok(Interpreter::from_parts(config, print_handler, globals))
    }
}
