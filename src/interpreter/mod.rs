//! # Interpreter
//!
//! The runtime value model and the tree-walking evaluator. Execution is
//! single-threaded and strictly recursive over the AST; every node
//! evaluates to an [`ObjectHolder`] against a [`Closure`] and a
//! [`Context`].

pub mod class;
pub mod error;
mod eval;
pub mod value;

use std::collections::HashMap;
use std::io;

pub use class::{Class, ClassInstance, Method};
pub use error::{ExecResult, Interrupt, RuntimeError};
pub use value::{Object, ObjectHolder};

use crate::ast::Statement;

/// A scope frame: a mapping from identifier to value.
///
/// Three kinds exist at runtime: the global closure for top-level code,
/// a call-local closure created per method invocation, and each class
/// instance's field closure.
pub type Closure = HashMap<String, ObjectHolder>;

/// Execution environment: supplies the output stream that `print` and
/// `__str__` dispatch write to.
pub struct Context<'a> {
    output: &'a mut dyn io::Write,
}

impl<'a> Context<'a> {
    pub fn new(output: &'a mut dyn io::Write) -> Self {
        Self { output }
    }

    pub fn output(&mut self) -> &mut dyn io::Write {
        &mut *self.output
    }
}

/// Execute a program against a fresh global closure, writing program
/// output to `output`.
pub fn run(program: &Statement, output: &mut dyn io::Write) -> Result<(), RuntimeError> {
    let mut globals = Closure::new();
    let mut context = Context::new(output);
    match program.execute(&mut globals, &mut context) {
        Ok(_) => Ok(()),
        Err(Interrupt::Error(error)) => Err(error),
        // Nothing above the top level can absorb a `return`.
        Err(Interrupt::Return(_)) => Err(RuntimeError::ReturnOutsideMethod),
    }
}
