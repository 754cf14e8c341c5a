//! Lexical-scoping, parent-chain environment.
//!
//! Unlike the engine's own flat, `Vec`-backed `Scope`, this is a chain of
//! shared, mutable frames: closures capture an `Environment` handle at
//! `def` time, and later mutations of that frame (new bindings, reassigned
//! variables) are visible to the closure, because all clones of an
//! `Environment` point at the same underlying frame.

use crate::token::EcoString;
use crate::value::Value;
use ahash::AHashMap;
use std::cell::RefCell;
use std::rc::Rc;

struct Frame {
    values: AHashMap<EcoString, Value>,
    parent: Option<Environment>,
}

/// A cheaply-`Clone`able handle onto a scope frame.
#[derive(Clone)]
pub struct Environment(Rc<RefCell<Frame>>);

impl Environment {
    /// A fresh environment with no parent.
    pub fn root() -> Self {
        Self(Rc::new(RefCell::new(Frame { values: AHashMap::default(), parent: None })))
    }

    /// A new environment whose parent is `self`.
    pub fn create_child(&self) -> Self {
        Self(Rc::new(RefCell::new(Frame {
            values: AHashMap::default(),
            parent: Some(self.clone()),
        })))
    }

    /// Search `self`, then walk parent links.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let frame = self.0.borrow();
        if let Some(value) = frame.values.get(name) {
            return Some(value.clone());
        }
        frame.parent.as_ref()?.lookup(name)
    }

    /// Assign-to-nearest-else-root: overwrite the binding in whichever
    /// frame owns `name`; if no frame owns it, bind it in the *root*
    /// frame, not the calling frame.
    pub fn assign(&self, name: &str, value: Value) {
        if self.assign_existing(name, value.clone()) {
            return;
        }
        self.root().bind_local(name.into(), value);
    }

    fn assign_existing(&self, name: &str, value: Value) -> bool {
        let mut frame = self.0.borrow_mut();
        if frame.values.contains_key(name) {
            frame.values.insert(name.into(), value);
            return true;
        }
        let parent = frame.parent.clone();
        drop(frame);
        match parent {
            Some(parent) => parent.assign_existing(name, value),
            None => false,
        }
    }

    /// Direct insertion into `self`'s own frame: used for function
    /// parameter binding, which is always local to the call frame.
    pub fn bind_local(&self, name: EcoString, value: Value) {
        self.0.borrow_mut().values.insert(name, value);
    }

    fn root(&self) -> Self {
        let parent = self.0.borrow().parent.clone();
        match parent {
            Some(parent) => parent.root(),
            None => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_the_parent_chain() {
        let root = Environment::root();
        root.bind_local("x".into(), Value::Int(1));
        let child = root.create_child();
        assert_eq!(child.lookup("x"), Some(Value::Int(1)));
    }

    #[test]
    fn assign_rebinds_the_owning_frame_not_the_caller() {
        let root = Environment::root();
        root.bind_local("x".into(), Value::Int(1));
        let child = root.create_child();
        child.assign("x", Value::Int(2));
        assert_eq!(root.lookup("x"), Some(Value::Int(2)));
        assert!(child.0.borrow().values.get("x").is_none());
    }

    #[test]
    fn assign_to_unbound_name_binds_in_root() {
        let root = Environment::root();
        let child = root.create_child();
        let grandchild = child.create_child();
        grandchild.assign("y", Value::Int(5));
        assert_eq!(root.lookup("y"), Some(Value::Int(5)));
        assert!(child.0.borrow().values.get("y").is_none());
    }

    #[test]
    fn closures_observe_later_mutation_of_their_definition_environment() {
        let root = Environment::root();
        root.bind_local("x".into(), Value::Int(1));
        let captured = root.clone();
        root.assign("x", Value::Int(42));
        assert_eq!(captured.lookup("x"), Some(Value::Int(42)));
    }
}
