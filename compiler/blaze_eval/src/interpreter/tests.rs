use super::*;
use crate::errors::EvalErrorKind;
use crate::natives::NativeRegistry;
use crate::print_handler::buffer_handler;
use blaze_ir::BinaryOp;
use pretty_assertions::assert_eq;

fn ident(name: &str) -> Node {
    Node::ident(name)
}

fn interpreter() -> Interpreter {
    Interpreter::builder().build().unwrap()
}

#[test]
fn test_default_build() {
    let interpreter = interpreter();
    assert_eq!(interpreter.config(), &EvalConfig::default());
    assert_eq!(interpreter.line(), 0);
    assert_eq!(interpreter.print_handler().output(), "");
}

#[test]
fn test_prelude_constants() {
    let interpreter = interpreter();
    let globals = interpreter.globals();
    assert_eq!(globals.local_len(), 3);
    assert_eq!(globals.lookup("null"), Some(Value::Null));
    assert_eq!(globals.lookup("true"), Some(Value::Bool(true)));
    assert_eq!(globals.lookup("false"), Some(Value::Bool(false)));
    assert!(globals.resolve("true").unwrap().is_const);
}

#[test]
fn test_builder_installs_natives_as_const_globals() {
    let handler = buffer_handler();
    let interpreter = Interpreter::builder()
        .print_handler(handler)
        .with_print_natives()
        .native("answer", |_, _| Ok(Value::int(42)))
        .build()
        .unwrap();

    for name in ["print", "println", "answer"] {
        let binding = interpreter.globals().resolve(name).unwrap();
        assert!(binding.is_const, "{name} should be const");
    }
}

#[test]
fn test_builder_merges_registries() {
    let mut first = NativeRegistry::new();
    first.register("a", |_, _| Ok(Value::int(1)));
    let mut second = NativeRegistry::new();
    second.register("b", |_, _| Ok(Value::int(2)));

    let interpreter = Interpreter::builder()
        .natives(first)
        .natives(second)
        .build()
        .unwrap();
    assert!(interpreter.globals().has_local("a"));
    assert!(interpreter.globals().has_local("b"));
}

#[test]
fn test_builder_reports_global_overflow() {
    let err = Interpreter::builder()
        .config(EvalConfig::new().with_global_capacity(1))
        .print_handler(buffer_handler())
        .with_print_natives()
        .build()
        .err()
        .unwrap();
    assert_eq!(err.kind, EvalErrorKind::TableOverflow { capacity: 1 });
}

#[test]
fn test_run_returns_last_statement_value() {
    let mut interpreter = interpreter();
    let program = Node::program(vec![
        Node::let_var("x", Node::int(1)),
        Node::binary(BinaryOp::Add, ident("x"), Node::int(41)),
    ]);
    assert_eq!(interpreter.run(&program).unwrap(), Value::int(42));
}

#[test]
fn test_empty_program_is_null() {
    let mut interpreter = interpreter();
    assert_eq!(interpreter.run(&Node::program(vec![])).unwrap(), Value::Null);
}

#[test]
fn test_globals_persist_between_runs() {
    let mut interpreter = interpreter();
    interpreter
        .run(&Node::program(vec![Node::let_var("x", Node::int(1))]))
        .unwrap();
    let value = interpreter
        .run(&Node::program(vec![ident("x")]))
        .unwrap();
    assert_eq!(value, Value::int(1));
}

#[test]
fn test_eval_in_host_supplied_environment() {
    let mut interpreter = interpreter();
    let scope = interpreter.globals().new_child();
    scope.declare("local", Value::int(7), false).unwrap();
    assert_eq!(interpreter.eval(&ident("local"), &scope).unwrap(), Value::int(7));
    let globals = interpreter.globals().clone();
    assert!(interpreter.eval(&ident("local"), &globals).is_err());
}

#[test]
fn test_error_carries_line_of_failing_node() {
    let mut interpreter = interpreter();
    let program = Node::program(vec![
        Node::let_var("x", Node::int(1)).at_line(1),
        ident("missing").at_line(4),
    ]);
    let err = interpreter.run(&program).unwrap_err();
    assert_eq!(err.line, Some(4));
    assert_eq!(err.to_string(), "undefined identifier 'missing' at line 4");
    assert_eq!(err.message(), "undefined identifier 'missing'");
}

#[test]
fn test_innermost_line_wins() {
    let mut interpreter = interpreter();
    let program = Node::program(vec![Node::binary(
        BinaryOp::Div,
        Node::int(1).at_line(2),
        Node::int(0).at_line(3),
    )
    .at_line(2)]);
    // The division itself is the failing node.
    assert_eq!(interpreter.run(&program).unwrap_err().line, Some(2));

    let program = Node::program(vec![Node::binary(
        BinaryOp::Add,
        Node::int(1).at_line(2),
        ident("nope").at_line(3),
    )
    .at_line(2)]);
    assert_eq!(interpreter.run(&program).unwrap_err().line, Some(3));
}

#[test]
fn test_host_call_of_user_function() {
    let mut interpreter = interpreter();
    let program = Node::program(vec![Node::function(
        "add",
        &["a", "b"],
        vec![Node::return_stmt(Some(Node::binary(
            BinaryOp::Add,
            ident("a"),
            ident("b"),
        )))],
    )]);
    let add = interpreter.run(&program).unwrap();
    assert_eq!(add.to_string(), "[Function add]");
    assert_eq!(
        interpreter.call(&add, &[Value::int(2), Value::int(3)]).unwrap(),
        Value::int(5)
    );
    assert_eq!(
        interpreter.call(&Value::Null, &[]).unwrap_err().kind,
        EvalErrorKind::NotCallable { type_name: "null" }
    );
}

#[test]
fn test_call_depth_limit() {
    let config = EvalConfig::new().with_max_call_depth(32);
    let mut interpreter = Interpreter::builder().config(config).build().unwrap();
    let program = Node::program(vec![
        Node::function(
            "forever",
            &[],
            vec![Node::return_stmt(Some(Node::call(ident("forever"), vec![])))],
        ),
        Node::call(ident("forever"), vec![]),
    ]);
    assert_eq!(
        interpreter.run(&program).unwrap_err().kind,
        EvalErrorKind::StackOverflow { limit: 32 }
    );

    // The depth counter unwinds with the error.
    let program = Node::program(vec![
        Node::function("one", &[], vec![Node::return_stmt(Some(Node::int(1)))]),
        Node::call(ident("one"), vec![]),
    ]);
    assert_eq!(interpreter.run(&program).unwrap(), Value::int(1));
}

#[test]
fn test_deep_recursion_within_limit() {
    let mut interpreter = interpreter();
    // function down(n) { if (n == 0) { return 0; } return down(n - 1); }
    let program = Node::program(vec![
        Node::function(
            "down",
            &["n"],
            vec![
                Node::if_else(
                    Node::binary(BinaryOp::Eq, ident("n"), Node::int(0)),
                    Node::block(vec![Node::return_stmt(Some(Node::int(0)))]),
                    None,
                ),
                Node::return_stmt(Some(Node::call(
                    ident("down"),
                    vec![Node::binary(BinaryOp::Sub, ident("n"), Node::int(1))],
                ))),
            ],
        ),
        Node::call(ident("down"), vec![Node::int(2000)]),
    ]);
    assert_eq!(interpreter.run(&program).unwrap(), Value::int(0));
}

#[test]
fn test_custom_loop_variable() {
    let handler = buffer_handler();
    let mut interpreter = Interpreter::builder()
        .config(EvalConfig::new().with_loop_variable("i"))
        .print_handler(handler.clone())
        .with_print_natives()
        .build()
        .unwrap();
    let program = Node::program(vec![Node::loop_stmt(
        Node::int(2),
        None,
        Node::block(vec![Node::call(ident("print"), vec![ident("i")])]),
    )]);
    interpreter.run(&program).unwrap();
    assert_eq!(handler.output(), "01");
}
