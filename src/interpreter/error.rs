use std::io;

use thiserror::Error;

use crate::interpreter::value::ObjectHolder;

/// A fatal evaluation failure. Mython programs have no way to observe
/// or handle these; they terminate execution.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("variable `{0}` not found")]
    UndefinedVariable(String),
    #[error("class `{class}` has no method `{method}` taking {arity} argument(s)")]
    NoSuchMethod {
        class: String,
        method: String,
        arity: usize,
    },
    #[error("cannot call method `{0}` on a value that is not a class instance")]
    MethodOnNonInstance(String),
    #[error("cannot access field `{0}` of a value that is not a class instance")]
    FieldOnNonInstance(String),
    #[error("unsupported operand types for `{0}`")]
    UnsupportedOperands(&'static str),
    #[error("division by zero")]
    DivisionByZero,
    #[error("`return` outside of a method")]
    ReturnOutsideMethod,
    #[error("cannot write program output: {0}")]
    Output(#[from] io::Error),
}

/// What travels up the evaluator's error channel: either a genuine
/// runtime failure, or a `return` value on its way to the enclosing
/// method body. Every node forwards both transparently with `?`; only a
/// method body absorbs the `Return` variant.
#[derive(Debug)]
pub enum Interrupt {
    Error(RuntimeError),
    Return(ObjectHolder),
}

impl From<RuntimeError> for Interrupt {
    fn from(error: RuntimeError) -> Self {
        Interrupt::Error(error)
    }
}

impl From<io::Error> for Interrupt {
    fn from(error: io::Error) -> Self {
        Interrupt::Error(RuntimeError::Output(error))
    }
}

pub type ExecResult = Result<ObjectHolder, Interrupt>;
