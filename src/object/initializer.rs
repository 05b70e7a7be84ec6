//! Builder for native objects, modelled on the teacher's
//! `ConstructorBuilder`/`ObjectInitializer` (`boa::builtins::object::mod`),
//! minus the `Context`/descriptor-attribute machinery this crate doesn't
//! need. Used uniformly for prototype tables, the browser façade, and
//! `console`.

use super::{NativeFunction, Object};
use crate::value::{object as value_object, Value};
#[cfg(test)]
use crate::error::JsResult;

pub struct ObjectInitializer {
    object: Object,
}

impl ObjectInitializer {
    pub fn new(prototype: Option<Value>) -> Self {
        ObjectInitializer { object: Object::with_prototype(prototype) }
    }

    pub fn function(mut self, name: &str, arity: usize, f: NativeFunction, prototype: Option<Value>) -> Self {
        self.object.set_own(name, value_object(Object::native_function(name, arity, f, prototype)));
        self
    }

    pub fn property(mut self, name: &str, value: Value) -> Self {
        self.object.set_own(name, value);
        self
    }

    pub fn build(self) -> Object {
        self.object
    }

    pub fn build_value(self) -> Value {
        value_object(self.object)
    }
}

/// Construct a standalone native function value, for callers that just
/// need one function (e.g. `setTimeout`) rather than a whole object.
pub fn native_function(name: &str, arity: usize, f: NativeFunction, prototype: Option<Value>) -> Value {
    value_object(Object::native_function(name, arity, f, prototype))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{number, undefined, ValueExt};

    fn noop(_: &Value, _: &[Value], _: &mut crate::interpreter::Interpreter) -> JsResult<Value> {
        Ok(undefined())
    }

    #[test]
    fn property_and_function_both_land_as_own_properties() {
        let obj = ObjectInitializer::new(None).property("x", number(1.0)).function("f", 0, noop, None).build();
        assert!(obj.get_own("x").is_some());
        let f = obj.get_own("f").unwrap();
        assert!(f.as_object().unwrap().borrow().is_callable());
    }

    #[test]
    fn build_value_wraps_the_object_in_a_value() {
        let value = ObjectInitializer::new(None).property("x", number(1.0)).build_value();
        assert!(value.is_object());
    }

    #[test]
    fn native_function_helper_produces_a_callable_value() {
        let value = native_function("standalone", 1, noop, None);
        assert!(value.as_object().unwrap().borrow().is_callable());
    }
}
