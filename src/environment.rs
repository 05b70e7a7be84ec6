//! Lexical environments (§4.C). A single concrete record kind — a name
//! map plus an optional `this` binding plus a parent pointer — simplified
//! from the teacher's multi-kind `EnvironmentRecordTrait` design and
//! grounded directly in `examples/original_source/environment.py`'s
//! `Environment`/`resolve`/`ExecutionContext`.

use crate::error::{JsError, JsErrorKind, JsResult};
use crate::value::{undefined, Value};
use gc::{Finalize, Gc, GcCell, Trace};
use rustc_hash::FxHashMap;

#[derive(Trace, Finalize)]
struct Binding {
    value: Value,
    mutable: bool,
    /// `let`/`const` bindings exist but are uninitialized until their
    /// declaration executes (a simplified TDZ check, not the full one —
    /// full TDZ is a spec Non-goal).
    initialized: bool,
}

#[derive(Trace, Finalize)]
pub struct EnvironmentRecord {
    bindings: FxHashMap<String, Binding>,
    this_binding: Option<Value>,
    parent: Option<Environment>,
}

pub type Environment = Gc<GcCell<EnvironmentRecord>>;

pub fn new_environment(parent: Option<Environment>) -> Environment {
    Gc::new(GcCell::new(EnvironmentRecord {
        bindings: FxHashMap::default(),
        this_binding: None,
        parent,
    }))
}

pub fn new_function_environment(parent: Option<Environment>, this: Value) -> Environment {
    Gc::new(GcCell::new(EnvironmentRecord {
        bindings: FxHashMap::default(),
        this_binding: Some(this),
        parent,
    }))
}

pub trait EnvironmentExt {
    fn declare_var(&self, name: &str, value: Value);
    fn declare_let(&self, name: &str, value: Value, initialized: bool);
    fn declare_const(&self, name: &str, value: Value);
    fn has_binding(&self, name: &str) -> bool;
    fn get_binding(&self, name: &str) -> JsResult<Value>;
    fn set_binding(&self, name: &str, value: Value) -> JsResult<()>;
    fn get_this(&self) -> Value;
    fn parent(&self) -> Option<Environment>;
}

impl EnvironmentExt for Environment {
    fn declare_var(&self, name: &str, value: Value) {
        // `var` hoists to the nearest function/global environment; the
        // interpreter is responsible for calling this on the right
        // environment (see `interpreter::declaration::hoist`).
        self.borrow_mut().bindings.insert(
            name.to_string(),
            Binding { value, mutable: true, initialized: true },
        );
    }

    fn declare_let(&self, name: &str, value: Value, initialized: bool) {
        self.borrow_mut().bindings.insert(
            name.to_string(),
            Binding { value, mutable: true, initialized },
        );
    }

    fn declare_const(&self, name: &str, value: Value) {
        self.borrow_mut().bindings.insert(
            name.to_string(),
            Binding { value, mutable: false, initialized: true },
        );
    }

    fn has_binding(&self, name: &str) -> bool {
        if self.borrow().bindings.contains_key(name) {
            return true;
        }
        match self.borrow().parent.clone() {
            Some(parent) => parent.has_binding(name),
            None => false,
        }
    }

    fn get_binding(&self, name: &str) -> JsResult<Value> {
        let record = self.borrow();
        if let Some(binding) = record.bindings.get(name) {
            if !binding.initialized {
                return Err(JsError::new(
                    JsErrorKind::Reference,
                    crate::value::string(format!(
                        "Cannot access '{}' before initialization",
                        name
                    )),
                ));
            }
            return Ok(binding.value.clone());
        }
        match record.parent.clone() {
            Some(parent) => {
                drop(record);
                parent.get_binding(name)
            }
            None => Err(JsError::new(
                JsErrorKind::Reference,
                crate::value::string(format!("{} is not defined", name)),
            )),
        }
    }

    fn set_binding(&self, name: &str, value: Value) -> JsResult<()> {
        let mut record = self.borrow_mut();
        if let Some(binding) = record.bindings.get_mut(name) {
            if !binding.mutable && binding.initialized {
                return Err(JsError::new(
                    JsErrorKind::Type,
                    crate::value::string(format!("Assignment to constant variable '{}'.", name)),
                ));
            }
            binding.value = value;
            binding.initialized = true;
            return Ok(());
        }
        let parent = record.parent.clone();
        drop(record);
        match parent {
            Some(parent) => parent.set_binding(name, value),
            None => Err(JsError::new(
                JsErrorKind::Reference,
                crate::value::string(format!("{} is not defined", name)),
            )),
        }
    }

    fn get_this(&self) -> Value {
        let record = self.borrow();
        match &record.this_binding {
            Some(v) => v.clone(),
            None => match record.parent.clone() {
                Some(parent) => {
                    drop(record);
                    parent.get_this()
                }
                None => undefined(),
            },
        }
    }

    fn parent(&self) -> Option<Environment> {
        self.borrow().parent.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::number;

    #[test]
    fn binding_resolves_through_parent_chain() {
        let parent = new_environment(None);
        parent.declare_var("x", number(1.0));
        let child = new_environment(Some(parent));
        assert_eq!(crate::value::to_number(&child.get_binding("x").unwrap()), 1.0);
    }

    #[test]
    fn shadowing_binding_in_child_does_not_affect_parent() {
        let parent = new_environment(None);
        parent.declare_var("x", number(1.0));
        let child = new_environment(Some(parent.clone()));
        child.declare_var("x", number(2.0));
        assert_eq!(crate::value::to_number(&child.get_binding("x").unwrap()), 2.0);
        assert_eq!(crate::value::to_number(&parent.get_binding("x").unwrap()), 1.0);
    }

    #[test]
    fn unresolved_identifier_yields_reference_error() {
        let env = new_environment(None);
        assert!(env.get_binding("missing").is_err());
    }

    #[test]
    fn const_reassignment_is_rejected() {
        let env = new_environment(None);
        env.declare_const("x", number(1.0));
        assert!(env.set_binding("x", number(2.0)).is_err());
    }

    #[test]
    fn set_binding_on_undeclared_name_is_reference_error() {
        let env = new_environment(None);
        assert!(env.set_binding("missing", number(1.0)).is_err());
    }

    #[test]
    fn this_binding_falls_through_to_enclosing_function_scope() {
        let outer = new_function_environment(None, number(42.0));
        let inner = new_environment(Some(outer));
        assert_eq!(crate::value::to_number(&inner.get_this()), 42.0);
    }

    #[test]
    fn uninitialized_let_binding_throws_on_access() {
        let env = new_environment(None);
        env.declare_let("x", undefined(), false);
        assert!(env.get_binding("x").is_err());
    }
}
