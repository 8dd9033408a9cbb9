//! Blaze IR - the abstract syntax tree handed to the evaluator.
//!
//! The lexer and parser live outside this workspace. They produce a tree of
//! [`Node`] values, each tagged with its source line, and the evaluator walks
//! that tree without ever mutating it.
//!
//! # Design Philosophy
//!
//! - **Closed sum types**: one `NodeKind` variant per node kind, so every
//!   dispatch site is an exhaustive `match`.
//! - **Shared function bodies**: parameter lists and bodies of function
//!   declarations are reference-counted slices, so closures built from them
//!   share the tree instead of copying it.

pub mod ast;

pub use ast::{BinaryOp, MemberKey, Node, NodeKind, Property, UnaryOp};
