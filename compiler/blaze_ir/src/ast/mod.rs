//! AST node types.
//!
//! Statements and expressions share one node type, as in the language
//! itself: every statement can appear where a value is expected and
//! evaluates to one.

mod build;
mod operators;

use std::fmt;
use std::rc::Rc;

pub use operators::{BinaryOp, UnaryOp};

/// A tree node tagged with the source line it came from.
#[derive(Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub line: u32,
}

impl Node {
    pub fn new(kind: NodeKind, line: u32) -> Self {
        Node { kind, line }
    }

    /// Return the same node tagged with `line`.
    #[must_use]
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    /// Returns `true` if this node is a `{ ... }` block.
    pub fn is_block(&self) -> bool {
        matches!(self.kind, NodeKind::Block { .. })
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ line {}", self.kind, self.line)
    }
}

/// One entry of an object literal.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub key: String,
    /// `None` for shorthand `{ x }`, which copies the binding named `x`.
    pub value: Option<Node>,
}

/// The key half of a member access.
#[derive(Clone, Debug, PartialEq)]
pub enum MemberKey {
    /// `object.name`
    Static(String),
    /// `object[expr]`; `expr` must evaluate to a string.
    Computed(Box<Node>),
}

/// Node kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Top-level statement list, evaluated in the global environment.
    Program { body: Vec<Node> },
    /// `{ ... }`, evaluated in a fresh child environment.
    Block { body: Vec<Node> },

    // Declarations
    VarDecl {
        name: String,
        is_const: bool,
        init: Option<Box<Node>>,
    },
    FunctionDecl {
        name: String,
        params: Rc<[String]>,
        body: Rc<[Node]>,
    },

    // Control flow
    If {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    While {
        cond: Box<Node>,
        body: Box<Node>,
    },
    For {
        init: Option<Box<Node>>,
        cond: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    /// `loop (bound) as name { ... }`
    Loop {
        bound: Box<Node>,
        binding: Option<String>,
        body: Box<Node>,
    },
    Break,
    Continue,
    Return(Option<Box<Node>>),

    // Expressions
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Assignment {
        target: Box<Node>,
        value: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    MemberAccess {
        object: Box<Node>,
        key: MemberKey,
    },
    ObjectLiteral(Vec<Property>),
    /// A property literal outside of an object literal. Parsers never emit
    /// this at statement position; the evaluator rejects it.
    PropertyLiteral(Box<Property>),

    // Leaves
    Identifier(String),
    Number { value: f64, is_float: bool },
    Str(String),
}

impl NodeKind {
    /// Short human-readable name of the node kind, for diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "program",
            NodeKind::Block { .. } => "block",
            NodeKind::VarDecl { .. } => "variable declaration",
            NodeKind::FunctionDecl { .. } => "function declaration",
            NodeKind::If { .. } => "if statement",
            NodeKind::While { .. } => "while loop",
            NodeKind::For { .. } => "for loop",
            NodeKind::Loop { .. } => "loop statement",
            NodeKind::Break => "break",
            NodeKind::Continue => "continue",
            NodeKind::Return(_) => "return",
            NodeKind::Binary { .. } => "binary expression",
            NodeKind::Unary { .. } => "unary expression",
            NodeKind::Assignment { .. } => "assignment",
            NodeKind::Call { .. } => "call expression",
            NodeKind::MemberAccess { .. } => "member access",
            NodeKind::ObjectLiteral(_) => "object literal",
            NodeKind::PropertyLiteral(_) => "property literal",
            NodeKind::Identifier(_) => "identifier",
            NodeKind::Number { .. } => "numeric literal",
            NodeKind::Str(_) => "string literal",
        }
    }
}
