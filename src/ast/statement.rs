use std::rc::Rc;

use crate::ast::expression::{Expr, VariableValue};
use crate::interpreter::class::Class;

#[derive(Debug, Clone)]
pub enum Statement {
    /// `name = expr`. Creates or overwrites the binding in the current
    /// closure; enclosing scopes are never searched.
    Assignment { var: String, value: Box<Expr> },
    /// `object.path.field = expr`. The path must resolve to a class
    /// instance; the binding goes into that instance's fields.
    FieldAssignment {
        object: VariableValue,
        field_name: String,
        value: Box<Expr>,
    },
    /// `print e1, e2, ...` renders the arguments separated by single
    /// spaces and terminated by a newline.
    Print(Vec<Expr>),
    /// A bare expression evaluated for its effect.
    Expression(Expr),
    Compound(Vec<Statement>),
    IfElse {
        condition: Expr,
        if_body: Box<Statement>,
        else_body: Option<Box<Statement>>,
    },
    /// Binds the class under its own name in the current closure.
    ClassDefinition(Rc<Class>),
    /// Evaluates its expression and unwinds to the enclosing method body.
    Return(Expr),
    /// The boundary that a `return` unwind cannot cross: runs its body
    /// and yields either the returned value or `None`.
    MethodBody(Box<Statement>),
}
