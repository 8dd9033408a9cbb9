//! Tests for loops, blocks and control signals.

use std::cell::RefCell;
use std::rc::Rc;

use blaze_ir::{BinaryOp, Node, UnaryOp};
use pretty_assertions::assert_eq;

use super::{println, run, run_with};
use crate::environment::WeakEnvironment;
use crate::errors::{ControlAction, EvalErrorKind};
use crate::exec::control::{
    discard_loop_signal, loop_bound, to_loop_status, LoopBound, LoopStatus,
};
use crate::interpreter::Interpreter;
use crate::value::Value;

fn ident(name: &str) -> Node {
    Node::ident(name)
}

fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
    Node::binary(op, left, right)
}

mod loop_status {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn completed_body() {
        assert_eq!(to_loop_status(Ok(Value::int(1))), Ok(LoopStatus::Returned));
    }

    #[test]
    fn break_and_continue_are_consumed() {
        assert_eq!(
            to_loop_status(Err(ControlAction::Break)),
            Ok(LoopStatus::Broke)
        );
        assert_eq!(
            to_loop_status(Err(ControlAction::Continue)),
            Ok(LoopStatus::Continued)
        );
    }

    #[test]
    fn return_keeps_propagating() {
        assert_eq!(
            to_loop_status(Err(ControlAction::Return(Value::int(3)))),
            Err(ControlAction::Return(Value::int(3)))
        );
    }

    #[test]
    fn discard_only_drops_loop_signals() {
        assert_eq!(discard_loop_signal(Err(ControlAction::Break)), Ok(Value::Null));
        assert_eq!(discard_loop_signal(Err(ControlAction::Continue)), Ok(Value::Null));
        assert_eq!(
            discard_loop_signal(Err(ControlAction::Return(Value::Null))),
            Err(ControlAction::Return(Value::Null))
        );
    }
}

mod loop_bounds {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepted_bounds() {
        assert_eq!(loop_bound(&Value::int(3)).unwrap(), LoopBound::Times(3));
        assert_eq!(loop_bound(&Value::int(0)).unwrap(), LoopBound::Times(0));
        assert_eq!(loop_bound(&Value::Bool(true)).unwrap(), LoopBound::Unbounded);
        assert_eq!(loop_bound(&Value::Bool(false)).unwrap(), LoopBound::Times(0));
    }

    #[test]
    fn negative_bound_is_invalid() {
        assert_eq!(
            loop_bound(&Value::int(-1)).unwrap_err().kind,
            EvalErrorKind::InvalidBound { bound: -1 }
        );
    }

    #[test]
    fn float_and_other_kinds_are_type_errors() {
        for value in [Value::float(2.0), Value::string("3"), Value::Null] {
            assert!(matches!(
                loop_bound(&value).unwrap_err().kind,
                EvalErrorKind::TypeError { .. }
            ));
        }
    }

    #[test]
    fn allows() {
        assert!(LoopBound::Times(2).allows(1));
        assert!(!LoopBound::Times(2).allows(2));
        assert!(LoopBound::Unbounded.allows(i64::MAX));
    }
}

/// for (let i = 0; i < 10; i++) {
///     visit(i);
///     if (i % 2 == 0) { continue; }
///     if (i == 5) { break; }
///     println(i);
/// }
#[test]
fn for_loop_with_continue_and_break() {
    let visited = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&visited);
    let builder = Interpreter::builder().native("visit", move |args, _| {
        sink.borrow_mut().extend(args.iter().cloned());
        Ok(Value::Null)
    });

    let body = Node::block(vec![
        Node::call(ident("visit"), vec![ident("i")]),
        Node::if_else(
            binary(
                BinaryOp::Eq,
                binary(BinaryOp::Mod, ident("i"), Node::int(2)),
                Node::int(0),
            ),
            Node::block(vec![Node::continue_stmt()]),
            None,
        ),
        Node::if_else(
            binary(BinaryOp::Eq, ident("i"), Node::int(5)),
            Node::block(vec![Node::break_stmt()]),
            None,
        ),
        println(vec![ident("i")]),
    ]);
    let program = vec![Node::for_loop(
        Some(Node::let_var("i", Node::int(0))),
        Some(binary(BinaryOp::Lt, ident("i"), Node::int(10))),
        Some(Node::unary(UnaryOp::PostIncrement, ident("i"))),
        body,
    )];

    let (_, run) = run_with(builder, program);
    run.result.unwrap();
    assert_eq!(run.output, "1\n3\n");
    assert_eq!(
        *visited.borrow(),
        (0..=5).map(Value::int).collect::<Vec<_>>()
    );
}

#[test]
fn for_loop_variable_is_scoped_to_the_loop() {
    let program = vec![
        Node::for_loop(
            Some(Node::let_var("i", Node::int(0))),
            Some(binary(BinaryOp::Lt, ident("i"), Node::int(2))),
            Some(Node::unary(UnaryOp::PreIncrement, ident("i"))),
            Node::block(vec![]),
        ),
        ident("i"),
    ];
    let err = run(program).result.unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedIdentifier {
            name: "i".to_string()
        }
    );
}

#[test]
fn for_loop_without_condition_runs_until_break() {
    // for (let i = 0; ; i++) { if (i == 3) { break; } print(i); }
    let program = vec![Node::for_loop(
        Some(Node::let_var("i", Node::int(0))),
        None,
        Some(Node::unary(UnaryOp::PostIncrement, ident("i"))),
        Node::block(vec![
            Node::if_else(
                binary(BinaryOp::Eq, ident("i"), Node::int(3)),
                Node::block(vec![Node::break_stmt()]),
                None,
            ),
            Node::call(ident("print"), vec![ident("i")]),
        ]),
    )];
    assert_eq!(run(program).output, "012");
}

#[test]
fn while_loop_with_continue() {
    // let n = 0; while (n < 5) { n++; if (n == 3) { continue; } print(n); }
    let program = vec![
        Node::let_var("n", Node::int(0)),
        Node::while_loop(
            binary(BinaryOp::Lt, ident("n"), Node::int(5)),
            Node::block(vec![
                Node::unary(UnaryOp::PostIncrement, ident("n")),
                Node::if_else(
                    binary(BinaryOp::Eq, ident("n"), Node::int(3)),
                    Node::block(vec![Node::continue_stmt()]),
                    None,
                ),
                Node::call(ident("print"), vec![ident("n")]),
            ]),
        ),
        ident("n"),
    ];
    let run = run(program);
    assert_eq!(run.result.unwrap(), Value::int(5));
    assert_eq!(run.output, "1245");
}

#[test]
fn break_leaves_only_the_innermost_loop() {
    // loop (2) as outer { loop (true) { print(outer); break; } }
    let program = vec![Node::loop_stmt(
        Node::int(2),
        Some("outer"),
        Node::block(vec![Node::loop_stmt(
            ident("true"),
            None,
            Node::block(vec![
                Node::call(ident("print"), vec![ident("outer")]),
                Node::break_stmt(),
            ]),
        )]),
    )];
    assert_eq!(run(program).output, "01");
}

/// loop (3) { capture(); println(iteration); }
#[test]
fn loop_binds_iteration_and_drops_each_scope() {
    let scopes: Rc<RefCell<Vec<WeakEnvironment>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&scopes);
    let builder = Interpreter::builder().native("capture", move |_, env| {
        sink.borrow_mut().push(env.downgrade());
        Ok(Value::Null)
    });

    let program = vec![Node::loop_stmt(
        Node::int(3),
        None,
        Node::block(vec![
            Node::call(ident("capture"), vec![]),
            println(vec![ident("iteration")]),
        ]),
    )];
    let (interpreter, run) = run_with(builder, program);
    run.result.unwrap();
    assert_eq!(run.output, "0\n1\n2\n");

    let scopes = scopes.borrow();
    assert_eq!(scopes.len(), 3);
    assert!(scopes.iter().all(WeakEnvironment::is_dropped));
    assert!(!interpreter.globals().has_local("iteration"));
}

fn capturing_builder() -> (
    crate::interpreter::InterpreterBuilder,
    Rc<RefCell<Vec<WeakEnvironment>>>,
) {
    let scopes: Rc<RefCell<Vec<WeakEnvironment>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&scopes);
    let builder = Interpreter::builder().native("capture", move |_, env| {
        sink.borrow_mut().push(env.downgrade());
        Ok(Value::Null)
    });
    (builder, scopes)
}

/// loop (3) { function helper() { return 1; } capture(); }
#[test]
fn scopes_declaring_functions_are_freed() {
    let (builder, scopes) = capturing_builder();
    let program = vec![Node::loop_stmt(
        Node::int(3),
        None,
        Node::block(vec![
            Node::function("helper", &[], vec![Node::return_stmt(Some(Node::int(1)))]),
            Node::call(ident("capture"), vec![]),
        ]),
    )];
    let (_, run) = run_with(builder, program);
    run.result.unwrap();

    let scopes = scopes.borrow();
    assert_eq!(scopes.len(), 3);
    assert!(scopes.iter().all(WeakEnvironment::is_dropped));
}

/// function work() { function inner() { return 2; } capture(); return inner(); }
/// work(); work();
#[test]
fn call_scopes_declaring_functions_are_freed() {
    let (builder, scopes) = capturing_builder();
    let program = vec![
        Node::function(
            "work",
            &[],
            vec![
                Node::function("inner", &[], vec![Node::return_stmt(Some(Node::int(2)))]),
                Node::call(ident("capture"), vec![]),
                Node::return_stmt(Some(Node::call(ident("inner"), vec![]))),
            ],
        ),
        Node::call(ident("work"), vec![]),
        Node::call(ident("work"), vec![]),
    ];
    let (_, run) = run_with(builder, program);
    assert_eq!(run.result.unwrap(), Value::int(2));

    let scopes = scopes.borrow();
    assert_eq!(scopes.len(), 2);
    assert!(scopes.iter().all(WeakEnvironment::is_dropped));
}

/// function make() { function get() { return 5; } capture(); return get; }
/// const g = make();
#[test]
fn returned_closure_keeps_its_scope() {
    let (builder, scopes) = capturing_builder();
    let program = vec![
        Node::function(
            "make",
            &[],
            vec![
                Node::function("get", &[], vec![Node::return_stmt(Some(Node::int(5)))]),
                Node::call(ident("capture"), vec![]),
                Node::return_stmt(Some(ident("get"))),
            ],
        ),
        Node::const_var("g", Node::call(ident("make"), vec![])),
        Node::call(ident("g"), vec![]),
    ];
    let (_interpreter, run) = run_with(builder, program);
    assert_eq!(run.result.unwrap(), Value::int(5));
    assert!(!scopes.borrow()[0].is_dropped());
}

#[test]
fn loop_counter_is_mutable_per_iteration() {
    // loop (2) as k { k = k + 10; print(k); }
    let program = vec![Node::loop_stmt(
        Node::int(2),
        Some("k"),
        Node::block(vec![
            Node::assign(ident("k"), binary(BinaryOp::Add, ident("k"), Node::int(10))),
            Node::call(ident("print"), vec![ident("k")]),
        ]),
    )];
    assert_eq!(run(program).output, "1011");
}

#[test]
fn loop_false_and_zero_never_run() {
    for bound in [ident("false"), Node::int(0)] {
        let program = vec![Node::loop_stmt(
            bound,
            None,
            Node::block(vec![println(vec![Node::string("ran")])]),
        )];
        assert_eq!(run(program).output, "");
    }
}

#[test]
fn loop_rejects_bad_bounds() {
    let program = vec![Node::loop_stmt(Node::int(-2), None, Node::block(vec![]))];
    assert_eq!(
        run(program).result.unwrap_err().kind,
        EvalErrorKind::InvalidBound { bound: -2 }
    );

    let program = vec![Node::loop_stmt(Node::float(2.0), None, Node::block(vec![]))];
    assert!(matches!(
        run(program).result.unwrap_err().kind,
        EvalErrorKind::TypeError { .. }
    ));
}

#[test]
fn loop_signal_escapes_if_without_block() {
    // while (true) { if (true) break; }
    let program = vec![
        Node::while_loop(
            ident("true"),
            Node::block(vec![Node::if_else(
                ident("true"),
                Node::break_stmt(),
                None,
            )]),
        ),
        Node::string("done"),
    ];
    assert_eq!(run(program).result.unwrap(), Value::string("done"));
}

#[test]
fn break_from_non_block_while_body_leaves_enclosing_loop() {
    // loop (3) { while (true) break; println(iteration); }
    let program = vec![Node::loop_stmt(
        Node::int(3),
        None,
        Node::block(vec![
            Node::while_loop(ident("true"), Node::break_stmt()),
            println(vec![ident("iteration")]),
        ]),
    )];
    let run = run(program);
    run.result.unwrap();
    assert_eq!(run.output, "");
}

#[test]
fn continue_from_non_block_for_body_is_not_consumed() {
    // loop (2) { for (let i = 0; i < 3; i++) continue; println("unreached"); } println("done");
    let program = vec![
        Node::loop_stmt(
            Node::int(2),
            None,
            Node::block(vec![
                Node::for_loop(
                    Some(Node::let_var("i", Node::int(0))),
                    Some(binary(BinaryOp::Lt, ident("i"), Node::int(3))),
                    Some(Node::unary(UnaryOp::PostIncrement, ident("i"))),
                    Node::continue_stmt(),
                ),
                println(vec![Node::string("unreached")]),
            ]),
        ),
        println(vec![Node::string("done")]),
    ];
    let run = run(program);
    run.result.unwrap();
    assert_eq!(run.output, "done\n");
}

#[test]
fn break_from_non_block_loop_body_is_not_consumed() {
    // function f() { loop (true) break; return 1; }
    // The break leaves the function body, where it is discarded.
    let program = vec![
        Node::function(
            "f",
            &[],
            vec![
                Node::loop_stmt(ident("true"), None, Node::break_stmt()),
                Node::return_stmt(Some(Node::int(1))),
            ],
        ),
        Node::call(ident("f"), vec![]),
    ];
    assert_eq!(run(program).result.unwrap(), Value::int(1));
}

#[test]
fn stray_break_at_top_level_is_discarded() {
    let program = vec![
        println(vec![Node::int(1)]),
        Node::break_stmt(),
        println(vec![Node::int(2)]),
    ];
    let run = run(program);
    run.result.unwrap();
    assert_eq!(run.output, "1\n2\n");
}

#[test]
fn stray_continue_in_function_body_is_discarded() {
    // function f() { continue; println("after"); return 1; }
    let program = vec![
        Node::function(
            "f",
            &[],
            vec![
                Node::continue_stmt(),
                println(vec![Node::string("after")]),
                Node::return_stmt(Some(Node::int(1))),
            ],
        ),
        Node::call(ident("f"), vec![]),
    ];
    let run = run(program);
    assert_eq!(run.result.unwrap(), Value::int(1));
    assert_eq!(run.output, "after\n");
}

#[test]
fn break_does_not_cross_a_call() {
    // function stop() { { break; } return 7; }
    // loop (3) { print(stop()); }
    let program = vec![
        Node::function(
            "stop",
            &[],
            vec![
                Node::block(vec![Node::break_stmt()]),
                Node::return_stmt(Some(Node::int(7))),
            ],
        ),
        Node::loop_stmt(
            Node::int(3),
            None,
            Node::block(vec![Node::call(
                ident("print"),
                vec![Node::call(ident("stop"), vec![])],
            )]),
        ),
    ];
    assert_eq!(run(program).output, "777");
}

#[test]
fn return_from_inside_nested_loops() {
    // function find() { loop (true) as i { loop (true) { if (i == 2) { return i; } break; } } }
    let program = vec![
        Node::function(
            "find",
            &[],
            vec![Node::loop_stmt(
                ident("true"),
                Some("i"),
                Node::block(vec![Node::loop_stmt(
                    ident("true"),
                    None,
                    Node::block(vec![
                        Node::if_else(
                            binary(BinaryOp::Eq, ident("i"), Node::int(2)),
                            Node::block(vec![Node::return_stmt(Some(ident("i")))]),
                            None,
                        ),
                        Node::break_stmt(),
                    ]),
                )]),
            )],
        ),
        Node::call(ident("find"), vec![]),
    ];
    assert_eq!(run(program).result.unwrap(), Value::int(2));
}

#[test]
fn top_level_return_ends_the_program() {
    let program = vec![
        println(vec![Node::int(1)]),
        Node::return_stmt(Some(Node::int(7))),
        println(vec![Node::int(2)]),
    ];
    let run = run(program);
    assert_eq!(run.result.unwrap(), Value::int(7));
    assert_eq!(run.output, "1\n");
}

#[test]
fn if_else_branches() {
    let choose = |cond: Node| {
        vec![Node::if_else(
            cond,
            Node::block(vec![Node::string("then")]),
            Some(Node::block(vec![Node::string("else")])),
        )]
    };
    assert_eq!(run(choose(Node::int(1))).result.unwrap(), Value::string("then"));
    assert_eq!(run(choose(Node::int(2))).result.unwrap(), Value::string("else"));
    assert_eq!(run(choose(ident("null"))).result.unwrap(), Value::string("else"));

    let program = vec![Node::if_else(Node::int(0), Node::string("then"), None)];
    assert_eq!(run(program).result.unwrap(), Value::Null);
}
