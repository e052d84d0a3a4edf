//! Execution of AST nodes.
//!
//! Both statements and expressions execute against a closure and a
//! context and produce an [`ObjectHolder`]. A `return` travels through
//! the error channel as [`Interrupt::Return`] and is absorbed by the
//! nearest enclosing method body; everything else forwards it with `?`.

use std::io::Write;

use crate::ast::{Comparator, Expr, Statement, VariableValue};
use crate::interpreter::class::{self, ClassInstance, ADD_METHOD, INIT_METHOD};
use crate::interpreter::error::{ExecResult, Interrupt, RuntimeError};
use crate::interpreter::value::{self, Object, ObjectHolder};
use crate::interpreter::{Closure, Context};

impl Statement {
    pub fn execute(&self, closure: &mut Closure, context: &mut Context) -> ExecResult {
        match self {
            Statement::Assignment { var, value } => {
                let value = value.execute(closure, context)?;
                closure.insert(var.clone(), value.clone());
                Ok(value)
            }
            Statement::FieldAssignment {
                object,
                field_name,
                value,
            } => {
                let target = object.resolve(closure)?;
                let target = target
                    .get()
                    .ok_or_else(|| RuntimeError::FieldOnNonInstance(field_name.clone()))?;
                let Object::Instance(instance) = &*target else {
                    return Err(RuntimeError::FieldOnNonInstance(field_name.clone()).into());
                };
                let value = value.execute(closure, context)?;
                instance
                    .fields_mut()
                    .insert(field_name.clone(), value.clone());
                Ok(value)
            }
            Statement::Print(args) => {
                for (position, arg) in args.iter().enumerate() {
                    if position > 0 {
                        write!(context.output(), " ")?;
                    }
                    let value = arg.execute(closure, context)?;
                    let rendered = value.render(context)?;
                    write!(context.output(), "{rendered}")?;
                }
                writeln!(context.output())?;
                Ok(ObjectHolder::none())
            }
            Statement::Expression(expr) => expr.execute(closure, context),
            Statement::Compound(statements) => {
                for statement in statements {
                    statement.execute(closure, context)?;
                }
                Ok(ObjectHolder::none())
            }
            Statement::IfElse {
                condition,
                if_body,
                else_body,
            } => {
                if value::is_true(&condition.execute(closure, context)?) {
                    if_body.execute(closure, context)
                } else if let Some(else_body) = else_body {
                    else_body.execute(closure, context)
                } else {
                    Ok(ObjectHolder::none())
                }
            }
            Statement::ClassDefinition(class) => {
                let holder = ObjectHolder::own(Object::Class(class.clone()));
                closure.insert(class.name().to_string(), holder.clone());
                Ok(holder)
            }
            Statement::Return(expr) => {
                Err(Interrupt::Return(expr.execute(closure, context)?))
            }
            Statement::MethodBody(body) => match body.execute(closure, context) {
                Ok(_) => Ok(ObjectHolder::none()),
                Err(Interrupt::Return(value)) => Ok(value),
                Err(interrupt) => Err(interrupt),
            },
        }
    }
}

impl Expr {
    pub fn execute(&self, closure: &mut Closure, context: &mut Context) -> ExecResult {
        match self {
            Expr::Number(value) => Ok(ObjectHolder::own(Object::Number(*value))),
            Expr::String(value) => Ok(ObjectHolder::own(Object::String(value.clone()))),
            Expr::Bool(value) => Ok(ObjectHolder::own(Object::Bool(*value))),
            Expr::None => Ok(ObjectHolder::none()),
            Expr::Variable(variable) => Ok(variable.resolve(closure)?),
            Expr::Stringify(argument) => {
                let value = argument.execute(closure, context)?;
                let rendered = value.render(context)?;
                Ok(ObjectHolder::own(Object::String(rendered)))
            }
            Expr::Add(lhs, rhs) => {
                let lhs = lhs.execute(closure, context)?;
                let rhs = rhs.execute(closure, context)?;
                if let (Some(l), Some(r)) = (lhs.get(), rhs.get()) {
                    match (&*l, &*r) {
                        (Object::Number(a), Object::Number(b)) => {
                            return Ok(ObjectHolder::own(Object::Number(a + b)));
                        }
                        (Object::String(a), Object::String(b)) => {
                            return Ok(ObjectHolder::own(Object::String(format!("{a}{b}"))));
                        }
                        _ => {}
                    }
                    if let Object::Instance(instance) = &*l {
                        if instance.has_method(ADD_METHOD, 1) {
                            return class::call_method(&l, ADD_METHOD, vec![rhs], context);
                        }
                    }
                }
                Err(RuntimeError::UnsupportedOperands("+").into())
            }
            Expr::Sub(lhs, rhs) => {
                let (lhs, rhs) = numeric_operands(lhs, rhs, "-", closure, context)?;
                Ok(ObjectHolder::own(Object::Number(lhs - rhs)))
            }
            Expr::Mult(lhs, rhs) => {
                let (lhs, rhs) = numeric_operands(lhs, rhs, "*", closure, context)?;
                Ok(ObjectHolder::own(Object::Number(lhs * rhs)))
            }
            Expr::Div(lhs, rhs) => {
                let (lhs, rhs) = numeric_operands(lhs, rhs, "/", closure, context)?;
                if rhs == 0 {
                    return Err(RuntimeError::DivisionByZero.into());
                }
                Ok(ObjectHolder::own(Object::Number(lhs / rhs)))
            }
            // `and` and `or` evaluate both operands before combining.
            Expr::Or(lhs, rhs) => {
                let lhs = value::is_true(&lhs.execute(closure, context)?);
                let rhs = value::is_true(&rhs.execute(closure, context)?);
                Ok(ObjectHolder::own(Object::Bool(lhs || rhs)))
            }
            Expr::And(lhs, rhs) => {
                let lhs = value::is_true(&lhs.execute(closure, context)?);
                let rhs = value::is_true(&rhs.execute(closure, context)?);
                Ok(ObjectHolder::own(Object::Bool(lhs && rhs)))
            }
            Expr::Not(argument) => {
                let verdict = !value::is_true(&argument.execute(closure, context)?);
                Ok(ObjectHolder::own(Object::Bool(verdict)))
            }
            Expr::Comparison(comparator, lhs, rhs) => {
                let lhs = lhs.execute(closure, context)?;
                let rhs = rhs.execute(closure, context)?;
                let verdict = match comparator {
                    Comparator::Equal => value::equal(&lhs, &rhs, context)?,
                    Comparator::NotEqual => value::not_equal(&lhs, &rhs, context)?,
                    Comparator::Less => value::less(&lhs, &rhs, context)?,
                    Comparator::Greater => value::greater(&lhs, &rhs, context)?,
                    Comparator::LessOrEqual => value::less_or_equal(&lhs, &rhs, context)?,
                    Comparator::GreaterOrEqual => value::greater_or_equal(&lhs, &rhs, context)?,
                };
                Ok(ObjectHolder::own(Object::Bool(verdict)))
            }
            Expr::MethodCall(call) => {
                let object = call.object.execute(closure, context)?;
                let mut args = Vec::with_capacity(call.args.len());
                for arg in &call.args {
                    args.push(arg.execute(closure, context)?);
                }
                let object = object
                    .get()
                    .ok_or_else(|| RuntimeError::MethodOnNonInstance(call.method.clone()))?;
                class::call_method(&object, &call.method, args, context)
            }
            Expr::NewInstance(new_instance) => {
                let instance = ClassInstance::create(new_instance.class.clone());
                let wants_init = new_instance
                    .class
                    .method(INIT_METHOD)
                    .is_some_and(|init| init.formal_params.len() == new_instance.args.len());
                if wants_init {
                    let mut args = Vec::with_capacity(new_instance.args.len());
                    for arg in &new_instance.args {
                        args.push(arg.execute(closure, context)?);
                    }
                    class::call_method(&instance, INIT_METHOD, args, context)?;
                }
                Ok(instance.into())
            }
        }
    }
}

impl VariableValue {
    /// Walk the dotted path: the first name in the given closure, every
    /// further name in the fields of the instance found so far.
    pub fn resolve(&self, closure: &Closure) -> Result<ObjectHolder, RuntimeError> {
        let Some((first, rest)) = self.dotted_ids.split_first() else {
            return Err(RuntimeError::UndefinedVariable(String::new()));
        };
        let mut value = closure
            .get(first)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable(first.clone()))?;
        for name in rest {
            let object = value
                .get()
                .ok_or_else(|| RuntimeError::FieldOnNonInstance(name.clone()))?;
            let Object::Instance(instance) = &*object else {
                return Err(RuntimeError::FieldOnNonInstance(name.clone()));
            };
            value = instance
                .fields()
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone()))?;
        }
        Ok(value)
    }
}

/// Evaluate both operands of an arithmetic operator that is defined for
/// numbers only.
fn numeric_operands(
    lhs: &Expr,
    rhs: &Expr,
    operator: &'static str,
    closure: &mut Closure,
    context: &mut Context,
) -> Result<(i64, i64), Interrupt> {
    let lhs = lhs.execute(closure, context)?;
    let rhs = rhs.execute(closure, context)?;
    match (lhs.get().as_deref(), rhs.get().as_deref()) {
        (Some(Object::Number(a)), Some(Object::Number(b))) => Ok((*a, *b)),
        _ => Err(RuntimeError::UnsupportedOperands(operator).into()),
    }
}
