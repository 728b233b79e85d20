//! Lexical scopes
//!
//! Each block and function call gets a child [`Scope`] linked to its parent.
//! Closures keep the scope they were created in alive through an `Rc`, so a
//! function returned from a snippet still sees the bindings it closed over.
//!
//! A closure bound by name in the scope it captures forms an `Rc` cycle. The
//! interpreter breaks it with [`Scope::clear`] once the call that created the
//! scope returns and nothing outside the call can reach it.
//!
//! Capabilities are not stored here: the interpreter consults them only after
//! the scope chain misses.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::value::Value;

#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    mutable: bool,
}

/// Outcome of assigning to a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Assigned,
    Immutable,
    Unbound,
}

#[derive(Debug, Default)]
pub struct Scope {
    bindings: RefCell<FxHashMap<String, Binding>>,
    parent: Option<Rc<Scope>>,
}

impl Scope {
    pub fn root() -> Rc<Scope> {
        Rc::new(Scope::default())
    }

    pub fn child(parent: &Rc<Scope>) -> Rc<Scope> {
        Rc::new(Scope {
            bindings: RefCell::new(FxHashMap::default()),
            parent: Some(parent.clone()),
        })
    }

    /// Bind a name in this scope. Returns false if it is already bound here.
    pub fn declare(&self, name: &str, value: Value, mutable: bool) -> bool {
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(name) {
            return false;
        }
        bindings.insert(name.to_string(), Binding { value, mutable });
        true
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(binding) = self.bindings.borrow().get(name) {
            return Some(binding.value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }

    /// Nearest scope in the chain that binds `name`
    pub fn defining_scope(self: &Rc<Self>, name: &str) -> Option<Rc<Scope>> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if scope.bindings.borrow().contains_key(name) {
                return Some(scope.clone());
            }
            current = scope.parent.as_ref();
        }
        None
    }

    /// Whether `self` is `ancestor` or lies inside it
    pub fn descends_from(&self, ancestor: &Scope) -> bool {
        let mut current = Some(self);
        while let Some(scope) = current {
            if std::ptr::eq(scope, ancestor) {
                return true;
            }
            current = scope.parent.as_deref();
        }
        false
    }

    /// Drop every binding, releasing closures that captured this scope
    pub fn clear(&self) {
        let bindings = std::mem::take(&mut *self.bindings.borrow_mut());
        drop(bindings);
    }

    pub fn assign(&self, name: &str, value: Value) -> Assignment {
        if let Some(binding) = self.bindings.borrow_mut().get_mut(name) {
            if !binding.mutable {
                return Assignment::Immutable;
            }
            binding.value = value;
            return Assignment::Assigned;
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Assignment::Unbound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_sees_parent_bindings() {
        let root = Scope::root();
        root.declare("x", Value::Number(1.0), false);
        let child = Scope::child(&root);
        assert_eq!(child.lookup("x"), Some(Value::Number(1.0)));
        assert_eq!(child.lookup("y"), None);
    }

    #[test]
    fn test_shadowing_and_redeclaration() {
        let root = Scope::root();
        assert!(root.declare("x", Value::Number(1.0), true));
        assert!(!root.declare("x", Value::Number(2.0), true));

        let child = Scope::child(&root);
        assert!(child.declare("x", Value::Number(3.0), true));
        assert_eq!(child.lookup("x"), Some(Value::Number(3.0)));
        assert_eq!(root.lookup("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_ancestry_and_defining_scope() {
        let root = Scope::root();
        root.declare("x", Value::Null, true);
        let child = Scope::child(&root);
        let sibling = Scope::child(&root);

        assert!(child.descends_from(&root));
        assert!(child.descends_from(&child));
        assert!(!root.descends_from(&child));
        assert!(!child.descends_from(&sibling));

        let owner = child.defining_scope("x").expect("x is bound in root");
        assert!(Rc::ptr_eq(&owner, &root));
        assert!(child.defining_scope("y").is_none());
    }

    #[test]
    fn test_clear_drops_bindings() {
        let root = Scope::root();
        let shared = Value::empty_object();
        root.declare("held", shared.clone(), false);
        root.clear();
        assert_eq!(root.lookup("held"), None);
        match shared {
            Value::Object(map) => assert_eq!(Rc::strong_count(&map), 1),
            other => panic!("Expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_assign_respects_mutability() {
        let root = Scope::root();
        root.declare("fixed", Value::Null, false);
        root.declare("open", Value::Null, true);
        let child = Scope::child(&root);

        assert_eq!(child.assign("fixed", Value::Bool(true)), Assignment::Immutable);
        assert_eq!(child.assign("open", Value::Bool(true)), Assignment::Assigned);
        assert_eq!(root.lookup("open"), Some(Value::Bool(true)));
        assert_eq!(child.assign("nowhere", Value::Null), Assignment::Unbound);
    }
}
