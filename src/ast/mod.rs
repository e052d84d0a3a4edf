//! Abstract syntax tree for Mython programs.
//!
//! Statements and expressions are separate enums, but both execute the
//! same way: every node evaluates to an [`ObjectHolder`] against a
//! closure and a context.
//!
//! [`ObjectHolder`]: crate::interpreter::ObjectHolder

pub mod expression;
pub mod statement;

pub use expression::{Comparator, Expr, MethodCall, NewInstance, VariableValue};
pub use statement::Statement;
