//! Lexical environments.
//!
//! An [`Environment`] is a shared handle to one scope. Each scope owns an
//! [`AssocTable`] of bindings and a handle to its parent, so a chain of
//! handles forms the static scope chain. Entering a block, call or loop
//! iteration creates a child through a [`ScopeGuard`]; leaving it drops the
//! handle. A closure keeps its declaring scope alive by holding another
//! handle to it, and [`Environment::close`] breaks the cycle once only the
//! scope's own closures are left holding it.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::config::{DEFAULT_GLOBAL_CAPACITY, DEFAULT_SCOPE_CAPACITY};
use crate::errors::{const_reassignment, undefined_identifier, EvalError};
use crate::table::AssocTable;
use crate::value::{Binding, Value};

/// Error returned by [`Environment::assign`] when assignment fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// No scope on the chain declares the name.
    Undefined,
    /// The owning binding is const.
    Const,
}

impl AssignError {
    /// The fatal error reported for assigning to `name`.
    pub fn into_eval_error(self, name: &str) -> EvalError {
        match self {
            AssignError::Undefined => undefined_identifier(name),
            AssignError::Const => const_reassignment(name),
        }
    }
}

/// A single-threaded scope wrapper for reference-counted interior mutability.
///
/// All scope allocations go through [`LocalScope::new`]. The wrapper is
/// `!Send`: an environment chain belongs to the thread that built it.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Returns `true` if both handles point at the same scope.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn downgrade(&self) -> Weak<RefCell<T>> {
        Rc::downgrade(&self.0)
    }

    fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A single scope containing variable bindings.
pub struct Scope {
    bindings: AssocTable<Binding>,
    parent: Option<Environment>,
    /// Table capacity handed to children of this scope.
    child_capacity: usize,
}

impl Scope {
    fn new(capacity: usize, child_capacity: usize, parent: Option<Environment>) -> Self {
        Scope {
            bindings: AssocTable::with_capacity(capacity),
            parent,
            child_capacity,
        }
    }
}

/// Shared handle to a scope and, through it, its ancestors.
#[derive(Clone)]
pub struct Environment(LocalScope<Scope>);

impl Environment {
    /// Create a global environment with default capacities.
    pub fn new() -> Self {
        Self::root(DEFAULT_GLOBAL_CAPACITY, DEFAULT_SCOPE_CAPACITY)
    }

    /// Create a global environment.
    ///
    /// `scope_capacity` is the table capacity of every descendant scope.
    pub fn root(global_capacity: usize, scope_capacity: usize) -> Self {
        Environment(LocalScope::new(Scope::new(
            global_capacity,
            scope_capacity,
            None,
        )))
    }

    /// Create an empty scope whose parent is this one.
    #[must_use]
    pub fn new_child(&self) -> Self {
        let capacity = self.0.borrow().child_capacity;
        Environment(LocalScope::new(Scope::new(
            capacity,
            capacity,
            Some(self.clone()),
        )))
    }

    /// Create a child scope that is closed when the returned guard drops.
    #[must_use]
    pub fn enter(&self) -> ScopeGuard {
        ScopeGuard(self.new_child())
    }

    /// Release a scope that is being left.
    ///
    /// A function declared in a scope holds a handle to that scope, so the
    /// two keep each other alive. If every handle other than `self` belongs
    /// to a closure stored in this scope's own bindings, the bindings are
    /// dropped and the scope is freed along with `self`.
    pub fn close(&self) {
        let captured: usize = {
            let scope = self.0.borrow();
            scope
                .bindings
                .iter()
                .map(|(_, binding)| self.captures_in(&binding.value))
                .sum()
        };
        if captured == 0 || self.0.strong_count() != captured + 1 {
            return;
        }
        let bindings =
            std::mem::replace(&mut self.0.borrow_mut().bindings, AssocTable::with_capacity(0));
        tracing::trace!(captured, "releasing closures of a finished scope");
        drop(bindings);
    }

    /// Handles to this scope held by closures inside `value`.
    ///
    /// Objects shared with other owners are not searched, so a closure
    /// reachable from outside is never counted.
    fn captures_in(&self, value: &Value) -> usize {
        match value {
            Value::Function(func) if func.env.ptr_eq(self) => 1,
            Value::Object(table) if Rc::strong_count(table) == 1 => table
                .iter()
                .map(|(_, binding)| self.captures_in(&binding.value))
                .sum(),
            _ => 0,
        }
    }

    /// Declare `name` in this scope.
    ///
    /// Shadowing an ancestor binding is always allowed. Declaring a name
    /// twice in the same scope overwrites the first binding.
    pub fn declare(&self, name: &str, value: Value, is_const: bool) -> Result<Binding, EvalError> {
        let binding = Binding::new(name, value, is_const);
        self.0.borrow_mut().bindings.set(name, binding.clone())?;
        Ok(binding)
    }

    /// Declare `name` in the global scope at the root of this chain.
    pub fn declare_global(
        &self,
        name: &str,
        value: Value,
        is_const: bool,
    ) -> Result<Binding, EvalError> {
        self.global().declare(name, value, is_const)
    }

    /// Find the nearest binding for `name`, walking outward.
    pub fn resolve(&self, name: &str) -> Option<Binding> {
        let mut scope = self.clone();
        loop {
            let parent = {
                let inner = scope.0.borrow();
                if let Some(binding) = inner.bindings.get(name) {
                    return Some(binding.clone());
                }
                inner.parent.clone()?
            };
            scope = parent;
        }
    }

    /// Value bound to `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.resolve(name).map(|binding| binding.value)
    }

    /// Overwrite the nearest binding for `name` in the scope that owns it.
    ///
    /// The write is visible through every handle to that scope.
    pub fn assign(&self, name: &str, value: Value) -> Result<Binding, AssignError> {
        let mut scope = self.clone();
        loop {
            let parent = {
                let mut inner = scope.0.borrow_mut();
                if let Some(binding) = inner.bindings.get_mut(name) {
                    if binding.is_const {
                        return Err(AssignError::Const);
                    }
                    binding.value = value;
                    return Ok(binding.clone());
                }
                inner.parent.clone()
            };
            match parent {
                Some(parent) => scope = parent,
                None => return Err(AssignError::Undefined),
            }
        }
    }

    /// Returns `true` if `name` is declared in this scope itself.
    pub fn has_local(&self, name: &str) -> bool {
        self.0.borrow().bindings.has(name)
    }

    /// Number of bindings declared in this scope itself.
    pub fn local_len(&self) -> usize {
        self.0.borrow().bindings.len()
    }

    pub fn parent(&self) -> Option<Environment> {
        self.0.borrow().parent.clone()
    }

    /// The root of this chain.
    pub fn global(&self) -> Environment {
        let mut scope = self.clone();
        while let Some(parent) = scope.parent() {
            scope = parent;
        }
        scope
    }

    /// Number of ancestors; the global scope has depth 0.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.parent();
        while let Some(current) = scope {
            depth += 1;
            scope = current.parent();
        }
        depth
    }

    /// Returns `true` if both handles refer to the same scope.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }

    /// A handle that does not keep the scope alive.
    pub fn downgrade(&self) -> WeakEnvironment {
        WeakEnvironment(self.0.downgrade())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

// Bindings may hold closures that capture this very scope, so only names
// are printed.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(scope) => f
                .debug_struct("Environment")
                .field("depth", &self.depth())
                .field("names", &scope.bindings.keys().collect::<Vec<_>>())
                .finish_non_exhaustive(),
            Err(_) => f.write_str("Environment { <borrowed> }"),
        }
    }
}

/// A block, call or loop-iteration scope, closed with
/// [`Environment::close`] when dropped.
pub struct ScopeGuard(Environment);

impl Deref for ScopeGuard {
    type Target = Environment;

    fn deref(&self) -> &Environment {
        &self.0
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Non-owning handle to an environment.
#[derive(Clone)]
pub struct WeakEnvironment(Weak<RefCell<Scope>>);

impl WeakEnvironment {
    /// The environment, if any strong handle still keeps it alive.
    pub fn upgrade(&self) -> Option<Environment> {
        self.0.upgrade().map(|rc| Environment(LocalScope(rc)))
    }

    /// Returns `true` once every strong handle has been dropped.
    pub fn is_dropped(&self) -> bool {
        self.0.strong_count() == 0
    }
}

impl fmt::Debug for WeakEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeakEnvironment(alive: {})", !self.is_dropped())
    }
}
