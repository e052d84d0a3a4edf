//! Runtime value representation: objects, handles to them, truthiness,
//! and the comparison rules.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::interpreter::class::{self, Class, ClassInstance, EQ_METHOD, LT_METHOD, STR_METHOD};
use crate::interpreter::error::{Interrupt, RuntimeError};
use crate::interpreter::Context;

/// A Mython value.
pub enum Object {
    Number(i64),
    String(String),
    Bool(bool),
    Class(Rc<Class>),
    Instance(ClassInstance),
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Number(value) => write!(f, "Number({value})"),
            Object::String(value) => write!(f, "String({value:?})"),
            Object::Bool(value) => write!(f, "Bool({value})"),
            Object::Class(class) => write!(f, "Class({})", class.name()),
            Object::Instance(instance) => fmt::Debug::fmt(instance, f),
        }
    }
}

#[derive(Clone)]
enum Handle {
    Owned(Rc<Object>),
    Shared(Weak<Object>),
}

/// A handle to an [`Object`], or the empty handle (the Mython `None`).
///
/// Handles are cheap to copy. An owned handle keeps its object alive; a
/// shared handle merely aliases an object owned elsewhere. Shared
/// handles exist for one purpose only: binding `self` without creating
/// an ownership cycle through the instance's own field closure, so they
/// are always backed by an owning handle further up the call stack.
#[derive(Clone, Default)]
pub struct ObjectHolder(Option<Handle>);

impl ObjectHolder {
    /// Take ownership of a freshly constructed object.
    pub fn own(object: Object) -> Self {
        Rc::new(object).into()
    }

    /// A non-owning alias of a live object.
    pub fn share(object: &Rc<Object>) -> Self {
        Self(Some(Handle::Shared(Rc::downgrade(object))))
    }

    /// The empty handle.
    pub fn none() -> Self {
        Self(None)
    }

    /// The object behind the handle, if any.
    pub fn get(&self) -> Option<Rc<Object>> {
        match &self.0 {
            Some(Handle::Owned(object)) => Some(object.clone()),
            Some(Handle::Shared(object)) => object.upgrade(),
            None => None,
        }
    }

    /// Render the value the way `print` would.
    ///
    /// Class instances dispatch to an arity-0 `__str__` when their class
    /// provides one and otherwise fall back to an identity form that is
    /// distinct per live instance.
    pub fn render(&self, context: &mut Context) -> Result<String, Interrupt> {
        let Some(object) = self.get() else {
            return Ok("None".to_string());
        };
        match &*object {
            Object::Number(value) => Ok(value.to_string()),
            Object::String(value) => Ok(value.clone()),
            Object::Bool(true) => Ok("True".to_string()),
            Object::Bool(false) => Ok("False".to_string()),
            Object::Class(class) => Ok(format!("Class {}", class.name())),
            Object::Instance(instance) => {
                if instance.has_method(STR_METHOD, 0) {
                    let rendered = class::call_method(&object, STR_METHOD, Vec::new(), context)?;
                    rendered.render(context)
                } else {
                    Ok(format!(
                        "<{} object at {:p}>",
                        instance.class().name(),
                        Rc::as_ptr(&object)
                    ))
                }
            }
        }
    }
}

impl From<Rc<Object>> for ObjectHolder {
    fn from(object: Rc<Object>) -> Self {
        Self(Some(Handle::Owned(object)))
    }
}

impl fmt::Debug for ObjectHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(object) => fmt::Debug::fmt(&object, f),
            None => write!(f, "None"),
        }
    }
}

/// Numbers are truthy when non-zero, strings when non-empty, booleans by
/// their value. Everything else, `None` included, is falsy.
pub fn is_true(object: &ObjectHolder) -> bool {
    match object.get().as_deref() {
        Some(Object::Number(value)) => *value != 0,
        Some(Object::String(value)) => !value.is_empty(),
        Some(Object::Bool(value)) => *value,
        _ => false,
    }
}

/// Two empty handles are equal; leaf values of the same kind compare by
/// payload; a class instance on the left dispatches to its `__eq__`.
/// Every other combination is a runtime error.
pub fn equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut Context,
) -> Result<bool, Interrupt> {
    match (lhs.get(), rhs.get()) {
        (None, None) => Ok(true),
        (Some(l), Some(r)) => {
            match (&*l, &*r) {
                (Object::Number(a), Object::Number(b)) => return Ok(a == b),
                (Object::String(a), Object::String(b)) => return Ok(a == b),
                (Object::Bool(a), Object::Bool(b)) => return Ok(a == b),
                _ => {}
            }
            if let Object::Instance(instance) = &*l {
                if instance.has_method(EQ_METHOD, 1) {
                    let verdict = class::call_method(&l, EQ_METHOD, vec![rhs.clone()], context)?;
                    return Ok(is_true(&verdict));
                }
            }
            Err(RuntimeError::UnsupportedOperands("==").into())
        }
        _ => Err(RuntimeError::UnsupportedOperands("==").into()),
    }
}

/// Leaf values of the same kind order by payload; a class instance on
/// the left dispatches to its `__lt__`. Empty handles never order.
pub fn less(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut Context,
) -> Result<bool, Interrupt> {
    if let (Some(l), Some(r)) = (lhs.get(), rhs.get()) {
        match (&*l, &*r) {
            (Object::Number(a), Object::Number(b)) => return Ok(a < b),
            (Object::String(a), Object::String(b)) => return Ok(a < b),
            (Object::Bool(a), Object::Bool(b)) => return Ok(a < b),
            _ => {}
        }
        if let Object::Instance(instance) = &*l {
            if instance.has_method(LT_METHOD, 1) {
                let verdict = class::call_method(&l, LT_METHOD, vec![rhs.clone()], context)?;
                return Ok(is_true(&verdict));
            }
        }
    }
    Err(RuntimeError::UnsupportedOperands("<").into())
}

// The remaining four comparisons are derived, so `__gt__` and friends
// are never looked up on instances.

pub fn not_equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut Context,
) -> Result<bool, Interrupt> {
    Ok(!equal(lhs, rhs, context)?)
}

pub fn greater(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut Context,
) -> Result<bool, Interrupt> {
    Ok(!less(lhs, rhs, context)? && !equal(lhs, rhs, context)?)
}

pub fn less_or_equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut Context,
) -> Result<bool, Interrupt> {
    Ok(less(lhs, rhs, context)? || equal(lhs, rhs, context)?)
}

pub fn greater_or_equal(
    lhs: &ObjectHolder,
    rhs: &ObjectHolder,
    context: &mut Context,
) -> Result<bool, Interrupt> {
    Ok(!less(lhs, rhs, context)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(value: i64) -> ObjectHolder {
        ObjectHolder::own(Object::Number(value))
    }

    fn string(value: &str) -> ObjectHolder {
        ObjectHolder::own(Object::String(value.to_string()))
    }

    #[test]
    fn truthiness() {
        assert!(is_true(&number(7)));
        assert!(!is_true(&number(0)));
        assert!(is_true(&string("x")));
        assert!(!is_true(&string("")));
        assert!(is_true(&ObjectHolder::own(Object::Bool(true))));
        assert!(!is_true(&ObjectHolder::own(Object::Bool(false))));
        assert!(!is_true(&ObjectHolder::none()));
    }

    #[test]
    fn leaf_equality_is_symmetric() {
        let mut sink = Vec::new();
        let mut context = Context::new(&mut sink);
        let (a, b) = (number(5), number(5));
        assert!(equal(&a, &b, &mut context).unwrap());
        assert!(equal(&b, &a, &mut context).unwrap());
        let (a, b) = (string("x"), string("y"));
        assert!(!equal(&a, &b, &mut context).unwrap());
        assert!(!equal(&b, &a, &mut context).unwrap());
    }

    #[test]
    fn nones_are_equal_but_unordered() {
        let mut sink = Vec::new();
        let mut context = Context::new(&mut sink);
        assert!(equal(&ObjectHolder::none(), &ObjectHolder::none(), &mut context).unwrap());
        assert!(less(&ObjectHolder::none(), &ObjectHolder::none(), &mut context).is_err());
    }

    #[test]
    fn derived_comparisons_follow_less_and_equal() {
        let mut sink = Vec::new();
        let mut context = Context::new(&mut sink);
        let (a, b) = (number(1), number(2));
        assert!(not_equal(&a, &b, &mut context).unwrap());
        assert!(greater(&b, &a, &mut context).unwrap());
        assert!(!greater(&a, &a, &mut context).unwrap());
        assert!(less_or_equal(&a, &a, &mut context).unwrap());
        assert!(greater_or_equal(&a, &a, &mut context).unwrap());
        assert!(!greater_or_equal(&a, &b, &mut context).unwrap());
    }

    #[test]
    fn mismatched_leaf_kinds_do_not_compare() {
        let mut sink = Vec::new();
        let mut context = Context::new(&mut sink);
        assert!(equal(&number(1), &string("1"), &mut context).is_err());
        assert!(less(&number(1), &ObjectHolder::none(), &mut context).is_err());
    }
}
