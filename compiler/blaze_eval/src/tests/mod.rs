//! Evaluator tests that span several modules.
//!
//! Programs are built with the `blaze_ir` constructors and run with a
//! buffered print handler so tests can assert on their output.

mod control_tests;

use blaze_ir::Node;

use crate::errors::EvalResult;
use crate::interpreter::{Interpreter, InterpreterBuilder};
use crate::print_handler::buffer_handler;

/// Result and printed output of one program run.
pub(crate) struct Run {
    pub result: EvalResult,
    pub output: String,
}

/// Run `statements` with `print`/`println` installed.
pub(crate) fn run(statements: Vec<Node>) -> Run {
    run_with(Interpreter::builder(), statements).1
}

/// Run `statements` with extra configuration on top of the print natives.
pub(crate) fn run_with(builder: InterpreterBuilder, statements: Vec<Node>) -> (Interpreter, Run) {
    let handler = buffer_handler();
    let mut interpreter = match builder
        .print_handler(handler.clone())
        .with_print_natives()
        .build()
    {
        Ok(interpreter) => interpreter,
        Err(e) => panic!("interpreter failed to build: {e}"),
    };
    let result = interpreter.run(&Node::program(statements));
    let output = handler.take();
    (interpreter, Run { result, output })
}

/// `println(args...)`
pub(crate) fn println(args: Vec<Node>) -> Node {
    Node::call(Node::ident("println"), args)
}
