//! Tree-walking interpreter for Blaze.
//!
//! # Architecture
//!
//! [`Interpreter::eval`] is the driver boundary. Below it, every node goes
//! through `exec`, which records the node's line, grows the native stack if
//! needed, and dispatches on the node kind. `exec` returns an
//! [`ExecResult`]: besides errors, its `Err` side carries `break`,
//! `continue` and `return` as [`ControlAction`]s until the loop or call
//! that owns them consumes them.
//!
//! Helpers that do not need the interpreter live in [`crate::exec`]:
//!
//! - `exec::expr`: identifiers, member access, object properties
//! - `exec::call`: arity and parameter binding
//! - `exec::control`: loop status and loop bounds
//!
//! # Scopes
//!
//! Blocks, calls and loop iterations each evaluate in a fresh child
//! [`Environment`] that is dropped when they finish. A call's scope is a
//! child of the function's captured environment, not of the caller's.

mod builder;

pub use builder::InterpreterBuilder;

use std::rc::Rc;

use blaze_ir::{MemberKey, Node, NodeKind, Property, UnaryOp};

use crate::config::EvalConfig;
use crate::environment::Environment;
use crate::errors::{
    const_reassignment, invalid_assignment_target, invalid_lvalue, not_callable, stack_overflow,
    undefined_identifier, unsupported_node, ControlAction, EvalError, EvalResult, ExecResult,
};
use crate::exec::call::{bind_parameters, check_arity};
use crate::exec::control::{discard_loop_signal, loop_bound, to_loop_status, LoopStatus};
use crate::exec::expr::{computed_key, eval_ident, get_property, shorthand_property};
use crate::operators::evaluate_binary;
use crate::print_handler::SharedPrintHandler;
use crate::stack::ensure_sufficient_stack;
use crate::unary_operators::evaluate_unary;
use crate::value::{Binding, Number, ObjectTable, UserFunction, Value};

/// Const globals every program starts with.
fn declare_prelude(globals: &Environment) -> Result<(), EvalError> {
    globals.declare("null", Value::Null, true)?;
    globals.declare("true", Value::Bool(true), true)?;
    globals.declare("false", Value::Bool(false), true)?;
    Ok(())
}

/// Evaluates Blaze syntax trees.
pub struct Interpreter {
    config: EvalConfig,
    print_handler: SharedPrintHandler,
    globals: Environment,
    /// Line of the node most recently entered.
    line: u32,
    /// Number of user-function calls in progress.
    call_depth: usize,
}

impl Interpreter {
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    fn from_parts(
        config: EvalConfig,
        print_handler: SharedPrintHandler,
        globals: Environment,
    ) -> Self {
        Interpreter {
            config,
            print_handler,
            globals,
            line: 0,
            call_depth: 0,
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Line of the node most recently entered.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Evaluate `program` in the global environment.
    pub fn run(&mut self, program: &Node) -> EvalResult {
        let globals = self.globals.clone();
        self.eval(program, &globals)
    }

    /// Evaluate `node` against `env`.
    ///
    /// A `return` reaching this point ends evaluation with its value; a
    /// stray `break` or `continue` yields `null`.
    pub fn eval(&mut self, node: &Node, env: &Environment) -> EvalResult {
        let result = self.exec(node, env);
        self.finish(result)
    }

    /// Call `callee` with `args` from the host, as if from the global scope.
    pub fn call(&mut self, callee: &Value, args: &[Value]) -> EvalResult {
        let globals = self.globals.clone();
        let result = self.call_value(callee, args, &globals);
        self.finish(result)
    }

    fn finish(&self, result: ExecResult) -> EvalResult {
        match result {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Break | ControlAction::Continue) => Ok(Value::Null),
            Err(ControlAction::Error(error)) => {
                let error = error.at_line(self.line);
                tracing::debug!(%error, "evaluation aborted");
                Err(error)
            }
        }
    }

    /// Evaluate one node.
    pub(crate) fn exec(&mut self, node: &Node, env: &Environment) -> ExecResult {
        ensure_sufficient_stack(|| {
            self.line = node.line;
            self.dispatch(node, env)
                .map_err(|action| action.at_line(node.line))
        })
    }

    fn dispatch(&mut self, node: &Node, env: &Environment) -> ExecResult {
        match &node.kind {
            NodeKind::Program { body } => self.exec_program(body, env),
            NodeKind::Block { body } => self.exec_block(body, env),

            NodeKind::VarDecl {
                name,
                is_const,
                init,
            } => {
                let value = match init {
                    Some(init) => self.exec(init, env)?,
                    None => Value::Null,
                };
                env.declare(name, value.clone(), *is_const)?;
                Ok(value)
            }
            NodeKind::FunctionDecl { name, params, body } => {
                let func = Value::Function(UserFunction {
                    name: Rc::from(name.as_str()),
                    params: Rc::clone(params),
                    body: Rc::clone(body),
                    env: env.clone(),
                });
                env.declare(name, func.clone(), true)?;
                Ok(func)
            }

            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.exec(cond, env)?.is_truthy() {
                    self.exec(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.exec(else_branch, env)
                } else {
                    Ok(Value::Null)
                }
            }
            NodeKind::While { cond, body } => self.exec_while(cond, body, env),
            NodeKind::For {
                init,
                cond,
                update,
                body,
            } => self.exec_for(init.as_deref(), cond.as_deref(), update.as_deref(), body, env),
            NodeKind::Loop {
                bound,
                binding,
                body,
            } => self.exec_loop(bound, binding.as_deref(), body, env),
            NodeKind::Break => Err(ControlAction::Break),
            NodeKind::Continue => Err(ControlAction::Continue),
            NodeKind::Return(value) => {
                let value = match value {
                    Some(value) => self.exec(value, env)?,
                    None => Value::Null,
                };
                Err(ControlAction::Return(value))
            }

            NodeKind::Binary { op, left, right } => {
                let right = self.exec(right, env)?;
                let left = self.exec(left, env)?;
                Ok(evaluate_binary(&left, &right, *op)?)
            }
            NodeKind::Unary { op, operand } => self.exec_unary(*op, operand, env),
            NodeKind::Assignment { target, value } => self.exec_assignment(target, value, env),
            NodeKind::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.exec(arg, env))
                    .collect::<ExecResult<Vec<_>>>()?;
                let callee = self.exec(callee, env)?;
                self.call_value(&callee, &args, env)
            }
            NodeKind::MemberAccess { object, key } => {
                let object = self.exec(object, env)?;
                match key {
                    MemberKey::Static(name) => Ok(get_property(&object, name)?),
                    MemberKey::Computed(key) => {
                        let key = self.exec(key, env)?;
                        Ok(get_property(&object, computed_key(&key)?)?)
                    }
                }
            }
            NodeKind::ObjectLiteral(properties) => self.exec_object(properties, env),
            NodeKind::PropertyLiteral(_) => Err(unsupported_node(node.kind.name()).into()),

            NodeKind::Identifier(name) => Ok(eval_ident(name, env)?),
            NodeKind::Number { value, is_float } => Ok(Value::Number(Number::new(*value, *is_float))),
            NodeKind::Str(text) => Ok(Value::string(text)),
        }
    }

    /// Top-level statements, in `env` itself.
    fn exec_program(&mut self, body: &[Node], env: &Environment) -> ExecResult {
        let mut last = Value::Null;
        for statement in body {
            last = discard_loop_signal(self.exec(statement, env))?;
        }
        Ok(last)
    }

    fn exec_block(&mut self, body: &[Node], env: &Environment) -> ExecResult {
        let scope = env.enter();
        tracing::trace!(depth = scope.depth(), statements = body.len(), "enter block");
        let mut last = Value::Null;
        for statement in body {
            last = self.exec(statement, &scope)?;
        }
        Ok(last)
    }

    fn exec_while(&mut self, cond: &Node, body: &Node, env: &Environment) -> ExecResult {
        while self.exec(cond, env)?.is_truthy() {
            if self.exec_loop_body(body, env)? == LoopStatus::Broke {
                break;
            }
        }
        Ok(Value::Null)
    }

    fn exec_for(
        &mut self,
        init: Option<&Node>,
        cond: Option<&Node>,
        update: Option<&Node>,
        body: &Node,
        env: &Environment,
    ) -> ExecResult {
        let scope = env.enter();
        if let Some(init) = init {
            self.exec(init, &scope)?;
        }
        loop {
            if let Some(cond) = cond {
                if !self.exec(cond, &scope)?.is_truthy() {
                    break;
                }
            }
            if self.exec_loop_body(body, &scope)? == LoopStatus::Broke {
                break;
            }
            if let Some(update) = update {
                self.exec(update, &scope)?;
            }
        }
        Ok(Value::Null)
    }

    fn exec_loop(
        &mut self,
        bound: &Node,
        binding: Option<&str>,
        body: &Node,
        env: &Environment,
    ) -> ExecResult {
        let bound = loop_bound(&self.exec(bound, env)?)?;
        let counter: Rc<str> = Rc::from(binding.unwrap_or(&self.config.loop_variable));
        tracing::trace!(?bound, counter = &*counter, "enter loop");

        let mut index = 0;
        while bound.allows(index) {
            let scope = env.enter();
            scope.declare(&counter, Value::int(index), false)?;
            if self.exec_loop_body(body, &scope)? == LoopStatus::Broke {
                break;
            }
            index += 1;
        }
        Ok(Value::Null)
    }

    /// One run of a loop body.
    ///
    /// Only a block body is under loop control: `break` and `continue` from
    /// any other body keep propagating past this loop.
    fn exec_loop_body(&mut self, body: &Node, env: &Environment) -> ExecResult<LoopStatus> {
        let result = self.exec(body, env);
        if body.is_block() {
            to_loop_status(result)
        } else {
            result.map(|_| LoopStatus::Returned)
        }
    }

    fn exec_unary(&mut self, op: UnaryOp, operand: &Node, env: &Environment) -> ExecResult {
        if !op.is_update() {
            let value = self.exec(operand, env)?;
            return Ok(evaluate_unary(&value, op)?);
        }

        let NodeKind::Identifier(name) = &operand.kind else {
            return Err(invalid_lvalue(op).into());
        };
        let old = eval_ident(name, env)?;
        let new = evaluate_unary(&old, op)?;
        env.assign(name, new.clone())
            .map_err(|e| e.into_eval_error(name))?;
        Ok(if op.is_prefix_update() { new } else { old })
    }

    fn exec_assignment(&mut self, target: &Node, value: &Node, env: &Environment) -> ExecResult {
        let NodeKind::Identifier(name) = &target.kind else {
            return Err(invalid_assignment_target(target.kind.name()).into());
        };
        match env.resolve(name) {
            None => return Err(undefined_identifier(name).into()),
            Some(binding) if binding.is_const => return Err(const_reassignment(name).into()),
            Some(_) => {}
        }

        let value = self.exec(value, env)?;
        let updated = env
            .assign(name, value)
            .map_err(|e| e.into_eval_error(name))?;
        Ok(updated.value)
    }

    fn exec_object(&mut self, properties: &[Property], env: &Environment) -> ExecResult {
        let mut table = ObjectTable::with_capacity(self.config.object_capacity);
        for property in properties {
            let binding = match &property.value {
                None => shorthand_property(&property.key, env)?,
                Some(value) => {
                    let value = self.exec(value, env)?;
                    Binding::new(&property.key, value.deep_copy(), false)
                }
            };
            table
                .set(&property.key, binding)
                .map_err(EvalError::from)?;
        }
        Ok(Value::object(table))
    }

    fn call_value(&mut self, callee: &Value, args: &[Value], env: &Environment) -> ExecResult {
        match callee {
            Value::Native(native) => Ok(native.call(args, env)?),
            Value::Function(func) => self.call_user(func, args),
            other => Err(not_callable(other).into()),
        }
    }

    /// Run a user function in a child of its captured environment.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %func.name, args = args.len()))]
    fn call_user(&mut self, func: &UserFunction, args: &[Value]) -> ExecResult {
        check_arity(func, args)?;
        if self.call_depth >= self.config.max_call_depth {
            return Err(stack_overflow(self.config.max_call_depth).into());
        }

        let scope = func.env.enter();
        bind_parameters(&scope, func, args)?;

        self.call_depth += 1;
        let result = self.exec_function_body(&func.body, &scope);
        self.call_depth -= 1;
        result
    }

    /// Function body statements, in the call scope itself.
    ///
    /// `return` ends the call with a deep copy of its value; a stray
    /// `break` or `continue` is dropped and the next statement runs.
    fn exec_function_body(&mut self, body: &[Node], scope: &Environment) -> ExecResult {
        for statement in body {
            match discard_loop_signal(self.exec(statement, scope)) {
                Ok(_) => {}
                Err(ControlAction::Return(value)) => return Ok(value.deep_copy()),
                Err(other) => return Err(other),
            }
        }
        Ok(Value::Null)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
