//! Interpreter configuration.

/// Table capacity of the global environment.
pub const DEFAULT_GLOBAL_CAPACITY: usize = 256;

/// Table capacity of every block, call and loop-iteration environment.
pub const DEFAULT_SCOPE_CAPACITY: usize = 64;

/// Table capacity of an object literal.
pub const DEFAULT_OBJECT_CAPACITY: usize = 64;

/// Maximum nesting of user-function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Counter name bound by `loop` when the program names none.
pub const DEFAULT_LOOP_VARIABLE: &str = "iteration";

/// Tunables for one interpreter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    pub global_capacity: usize,
    pub scope_capacity: usize,
    pub object_capacity: usize,
    pub max_call_depth: usize,
    pub loop_variable: String,
}

impl EvalConfig {
    pub fn new() -> Self {
        EvalConfig {
            global_capacity: DEFAULT_GLOBAL_CAPACITY,
            scope_capacity: DEFAULT_SCOPE_CAPACITY,
            object_capacity: DEFAULT_OBJECT_CAPACITY,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            loop_variable: DEFAULT_LOOP_VARIABLE.to_string(),
        }
    }

    #[must_use]
    pub fn with_global_capacity(mut self, capacity: usize) -> Self {
        self.global_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_scope_capacity(mut self, capacity: usize) -> Self {
        self.scope_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_object_capacity(mut self, capacity: usize) -> Self {
        self.object_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn with_loop_variable(mut self, name: impl Into<String>) -> Self {
        self.loop_variable = name.into();
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::new()
    }
}
