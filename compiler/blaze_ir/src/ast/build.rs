//! Convenience constructors for AST producers and tests.
//!
//! Every constructor tags the node with line 0; use [`Node::at_line`] to
//! attach a real source line.

use std::rc::Rc;

use super::{BinaryOp, MemberKey, Node, NodeKind, Property, UnaryOp};

fn boxed(node: Node) -> Box<Node> {
    Box::new(node)
}

impl Node {
    fn leaf(kind: NodeKind) -> Self {
        Node::new(kind, 0)
    }

    pub fn program(body: Vec<Node>) -> Self {
        Node::leaf(NodeKind::Program { body })
    }

    pub fn block(body: Vec<Node>) -> Self {
        Node::leaf(NodeKind::Block { body })
    }

    /// Integer literal.
    #[expect(
        clippy::cast_precision_loss,
        reason = "literal values come from source text and fit in f64"
    )]
    pub fn int(value: i64) -> Self {
        Node::leaf(NodeKind::Number {
            value: value as f64,
            is_float: false,
        })
    }

    /// Floating-point literal, flagged as float even when it has no
    /// fractional part (`2.0`).
    pub fn float(value: f64) -> Self {
        Node::leaf(NodeKind::Number {
            value,
            is_float: true,
        })
    }

    pub fn string(text: impl Into<String>) -> Self {
        Node::leaf(NodeKind::Str(text.into()))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Node::leaf(NodeKind::Identifier(name.into()))
    }

    pub fn var_decl(name: impl Into<String>, is_const: bool, init: Option<Node>) -> Self {
        Node::leaf(NodeKind::VarDecl {
            name: name.into(),
            is_const,
            init: init.map(boxed),
        })
    }

    /// `var name = init;`
    pub fn let_var(name: impl Into<String>, init: Node) -> Self {
        Node::var_decl(name, false, Some(init))
    }

    /// `const name = init;`
    pub fn const_var(name: impl Into<String>, init: Node) -> Self {
        Node::var_decl(name, true, Some(init))
    }

    pub fn function(name: impl Into<String>, params: &[&str], body: Vec<Node>) -> Self {
        let params: Rc<[String]> = params.iter().map(|p| (*p).to_string()).collect();
        Node::leaf(NodeKind::FunctionDecl {
            name: name.into(),
            params,
            body: body.into(),
        })
    }

    pub fn if_else(cond: Node, then_branch: Node, else_branch: Option<Node>) -> Self {
        Node::leaf(NodeKind::If {
            cond: boxed(cond),
            then_branch: boxed(then_branch),
            else_branch: else_branch.map(boxed),
        })
    }

    pub fn while_loop(cond: Node, body: Node) -> Self {
        Node::leaf(NodeKind::While {
            cond: boxed(cond),
            body: boxed(body),
        })
    }

    pub fn for_loop(
        init: Option<Node>,
        cond: Option<Node>,
        update: Option<Node>,
        body: Node,
    ) -> Self {
        Node::leaf(NodeKind::For {
            init: init.map(boxed),
            cond: cond.map(boxed),
            update: update.map(boxed),
            body: boxed(body),
        })
    }

    pub fn loop_stmt(bound: Node, binding: Option<&str>, body: Node) -> Self {
        Node::leaf(NodeKind::Loop {
            bound: boxed(bound),
            binding: binding.map(str::to_string),
            body: boxed(body),
        })
    }

    pub fn break_stmt() -> Self {
        Node::leaf(NodeKind::Break)
    }

    pub fn continue_stmt() -> Self {
        Node::leaf(NodeKind::Continue)
    }

    pub fn return_stmt(value: Option<Node>) -> Self {
        Node::leaf(NodeKind::Return(value.map(boxed)))
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Node::leaf(NodeKind::Binary {
            op,
            left: boxed(left),
            right: boxed(right),
        })
    }

    pub fn unary(op: UnaryOp, operand: Node) -> Self {
        Node::leaf(NodeKind::Unary {
            op,
            operand: boxed(operand),
        })
    }

    pub fn assign(target: Node, value: Node) -> Self {
        Node::leaf(NodeKind::Assignment {
            target: boxed(target),
            value: boxed(value),
        })
    }

    pub fn call(callee: Node, args: Vec<Node>) -> Self {
        Node::leaf(NodeKind::Call {
            callee: boxed(callee),
            args,
        })
    }

    /// `object.name`
    pub fn member(object: Node, name: impl Into<String>) -> Self {
        Node::leaf(NodeKind::MemberAccess {
            object: boxed(object),
            key: MemberKey::Static(name.into()),
        })
    }

    /// `object[key]`
    pub fn computed_member(object: Node, key: Node) -> Self {
        Node::leaf(NodeKind::MemberAccess {
            object: boxed(object),
            key: MemberKey::Computed(boxed(key)),
        })
    }

    pub fn object(properties: Vec<Property>) -> Self {
        Node::leaf(NodeKind::ObjectLiteral(properties))
    }

    /// A property outside of an object literal.
    pub fn property(property: Property) -> Self {
        Node::leaf(NodeKind::PropertyLiteral(Box::new(property)))
    }
}

impl Property {
    /// `{ key }`
    pub fn shorthand(key: impl Into<String>) -> Self {
        Property {
            key: key.into(),
            value: None,
        }
    }

    /// `{ key: value }`
    pub fn keyed(key: impl Into<String>, value: Node) -> Self {
        Property {
            key: key.into(),
            value: Some(value),
        }
    }
}
