//! Runtime values for the Blaze interpreter.
//!
//! # Ownership
//!
//! Heap payloads (strings, object tables) sit behind `Rc`, so `Clone` is
//! cheap and shares them. Reads that stay inside one scope use `Clone`.
//! Values that cross an ownership boundary (object literal capture, call
//! arguments, return values) go through [`Value::deep_copy`]:
//!
//! - numbers, booleans, null and native functions copy trivially
//! - strings duplicate their text
//! - objects duplicate their table, recursively deep-copying each binding
//! - user functions duplicate the name but share parameter names, body and
//!   captured environment
//!
//! Sharing the captured environment is what makes closures observe later
//! mutation of the scope that declared them.

mod number;

use std::fmt;
use std::rc::Rc;

use blaze_ir::Node;

use crate::environment::Environment;
use crate::natives::NativeFunction;
use crate::table::{AssocTable, DeepCopy};

pub use number::{format_g, Number};

/// Property table of an object value.
pub type ObjectTable = AssocTable<Binding>;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    Number(Number),
    Bool(bool),
    Null,
    Str(Rc<str>),
    Object(Rc<ObjectTable>),
    Native(NativeFunction),
    Function(UserFunction),
}

impl Value {
    pub fn int(value: i64) -> Self {
        Value::Number(Number::int(value))
    }

    pub fn float(value: f64) -> Self {
        Value::Number(Number::float(value))
    }

    pub fn string(text: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(text.as_ref()))
    }

    pub fn object(table: ObjectTable) -> Self {
        Value::Object(Rc::new(table))
    }

    /// Name of the value's kind, for diagnostics.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Native(_) => "native function",
            Value::Function(_) => "function",
        }
    }

    /// Truthiness used by conditions and logical operators.
    ///
    /// `null` is false; numbers and booleans are true only when equal to 1;
    /// every other value is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Number(n) => n.is_one(),
            Value::Bool(b) => *b,
            Value::Str(_) | Value::Object(_) | Value::Native(_) | Value::Function(_) => true,
        }
    }

    /// Numeric view used by arithmetic: numbers as-is, booleans as 0/1.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(Number::from_bool(*b)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Copy this value across an ownership boundary.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        match self {
            Value::Number(_) | Value::Bool(_) | Value::Null | Value::Native(_) => self.clone(),
            Value::Str(s) => Value::Str(Rc::from(&**s)),
            Value::Object(table) => Value::Object(Rc::new(table.copy_deep())),
            Value::Function(func) => Value::Function(UserFunction {
                name: Rc::from(&*func.name),
                params: Rc::clone(&func.params),
                body: Rc::clone(&func.body),
                env: func.env.clone(),
            }),
        }
    }
}

impl DeepCopy for Value {
    fn deep_copy(&self) -> Self {
        Value::deep_copy(self)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Null => write!(f, "Null"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Object(table) => write!(f, "Object({table:?})"),
            Value::Native(native) => write!(f, "{native:?}"),
            Value::Function(func) => write!(f, "{func:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "null"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Object(table) => {
                if table.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (i, (key, binding)) in table.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {}", binding.value)?;
                }
                write!(f, " }}")
            }
            Value::Native(native) => write!(f, "[Native Function {}]", native.name()),
            Value::Function(func) => write!(f, "[Function {}]", func.name),
        }
    }
}

/// A named slot holding a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub name: Rc<str>,
    pub is_const: bool,
    pub value: Value,
}

impl Binding {
    pub fn new(name: &str, value: Value, is_const: bool) -> Self {
        Binding {
            name: Rc::from(name),
            is_const,
            value,
        }
    }
}

impl DeepCopy for Binding {
    fn deep_copy(&self) -> Self {
        Binding {
            name: Rc::from(&*self.name),
            is_const: self.is_const,
            value: self.value.deep_copy(),
        }
    }
}

/// A closure: a function declaration paired with the scope it was declared in.
#[derive(Clone)]
pub struct UserFunction {
    pub name: Rc<str>,
    /// Shared with the declaring AST node.
    pub params: Rc<[String]>,
    /// Shared with the declaring AST node.
    pub body: Rc<[Node]>,
    /// Handle to the declaring scope, not a snapshot of it.
    pub env: Environment,
}

impl UserFunction {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Functions are equal when they share code and captured scope.
impl PartialEq for UserFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && Rc::ptr_eq(&self.params, &other.params)
            && Rc::ptr_eq(&self.body, &other.body)
            && self.env.ptr_eq(&other.env)
    }
}

// The captured environment can contain this very function, so it is left
// out of the debug output.
impl fmt::Debug for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserFunction")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
