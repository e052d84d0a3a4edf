//! Classes, methods, and class instances.
//!
//! A class is immutable once built: a name, a method table kept sorted
//! by name, and an optional parent. Instances pair a class reference
//! with a mutable field closure.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::ast::Statement;
use crate::interpreter::error::{ExecResult, RuntimeError};
use crate::interpreter::value::{Object, ObjectHolder};
use crate::interpreter::{Closure, Context};

const SELF_ID: &str = "self";

pub(crate) const INIT_METHOD: &str = "__init__";
pub(crate) const STR_METHOD: &str = "__str__";
pub(crate) const EQ_METHOD: &str = "__eq__";
pub(crate) const LT_METHOD: &str = "__lt__";
pub(crate) const ADD_METHOD: &str = "__add__";

#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub formal_params: Vec<String>,
    pub body: Statement,
}

#[derive(Debug)]
pub struct Class {
    name: String,
    methods: Vec<Method>,
    parent: Option<Rc<Class>>,
}

impl Class {
    pub fn new(
        name: impl Into<String>,
        mut methods: Vec<Method>,
        parent: Option<Rc<Class>>,
    ) -> Self {
        methods.sort_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
        Self {
            name: name.into(),
            methods,
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a method by name, walking up the ancestor chain on a
    /// miss. A definition in the class itself wins over one in any
    /// ancestor.
    pub fn method(&self, name: &str) -> Option<&Method> {
        match self
            .methods
            .binary_search_by(|method| method.name.as_str().cmp(name))
        {
            Ok(found) => Some(&self.methods[found]),
            Err(_) => self.parent.as_deref().and_then(|parent| parent.method(name)),
        }
    }
}

pub struct ClassInstance {
    class: Rc<Class>,
    fields: RefCell<Closure>,
}

impl ClassInstance {
    /// Build a fresh instance of `class`. The field closure starts out
    /// holding `self`, a non-owning handle back to the instance itself.
    pub fn create(class: Rc<Class>) -> Rc<Object> {
        let instance = Rc::new(Object::Instance(Self {
            class,
            fields: RefCell::new(Closure::new()),
        }));
        if let Object::Instance(inner) = &*instance {
            inner
                .fields
                .borrow_mut()
                .insert(SELF_ID.to_string(), ObjectHolder::share(&instance));
        }
        instance
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn fields(&self) -> Ref<'_, Closure> {
        self.fields.borrow()
    }

    pub fn fields_mut(&self) -> RefMut<'_, Closure> {
        self.fields.borrow_mut()
    }

    /// Whether the class chain provides `method` taking exactly
    /// `argument_count` arguments. Arity must match exactly; there is no
    /// overloading.
    pub fn has_method(&self, method: &str, argument_count: usize) -> bool {
        self.class
            .method(method)
            .is_some_and(|found| found.formal_params.len() == argument_count)
    }
}

impl fmt::Debug for ClassInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInstance")
            .field("class", &self.class.name())
            .finish_non_exhaustive()
    }
}

/// Dispatch `method` on `instance`, which must hold a class instance.
///
/// The body runs in a fresh closure holding the formal parameters bound
/// to the actual arguments plus `self` aliasing the instance. Only that
/// closure and the instance's fields are visible to the body.
pub fn call_method(
    instance: &Rc<Object>,
    method: &str,
    actual_args: Vec<ObjectHolder>,
    context: &mut Context,
) -> ExecResult {
    let Object::Instance(this) = &**instance else {
        return Err(RuntimeError::MethodOnNonInstance(method.to_string()).into());
    };
    let found = this
        .class
        .method(method)
        .filter(|found| found.formal_params.len() == actual_args.len());
    let Some(found) = found else {
        return Err(RuntimeError::NoSuchMethod {
            class: this.class.name().to_string(),
            method: method.to_string(),
            arity: actual_args.len(),
        }
        .into());
    };

    let mut closure = Closure::new();
    for (param, arg) in found.formal_params.iter().zip(actual_args) {
        closure.insert(param.clone(), arg);
    }
    closure.insert(SELF_ID.to_string(), ObjectHolder::share(instance));
    found.body.execute(&mut closure, context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, params: &[&str]) -> Method {
        Method {
            name: name.to_string(),
            formal_params: params.iter().map(|p| p.to_string()).collect(),
            body: Statement::Compound(Vec::new()),
        }
    }

    #[test]
    fn lookup_prefers_own_definition_over_ancestor() {
        let base = Rc::new(Class::new(
            "Base",
            vec![method("f", &[]), method("g", &[])],
            None,
        ));
        let derived = Class::new("Derived", vec![method("f", &["x"])], Some(base));

        let found = derived.method("f").unwrap();
        assert_eq!(found.formal_params.len(), 1);
        assert!(derived.method("g").is_some());
        assert!(derived.method("h").is_none());
    }

    #[test]
    fn has_method_requires_exact_arity() {
        let class = Rc::new(Class::new("C", vec![method("f", &["a", "b"])], None));
        let instance = ClassInstance::create(class);
        let Object::Instance(inner) = &*instance else {
            unreachable!();
        };
        assert!(inner.has_method("f", 2));
        assert!(!inner.has_method("f", 1));
        assert!(!inner.has_method("f", 3));
    }

    #[test]
    fn fresh_instance_binds_self() {
        let class = Rc::new(Class::new("C", Vec::new(), None));
        let instance = ClassInstance::create(class);
        let Object::Instance(inner) = &*instance else {
            unreachable!();
        };
        let fields = inner.fields();
        let bound = fields.get("self").unwrap().get().unwrap();
        assert!(Rc::ptr_eq(&bound, &instance));
    }
}
