//! `Error.prototype` and the native error constructors
//! (`TypeError`/`RangeError`/`ReferenceError`/`SyntaxError`/`URIError`),
//! grounded on the TypeError-dominant error usage throughout
//! `examples/original_source/interpreter.py` and `window.py`.

use crate::error::{JsError, JsErrorKind};
use crate::interpreter::Interpreter;
use crate::object::{native_function, Object};
use crate::value::{object as value_object, string, to_js_string, Value, ValueExt};

pub fn install_error_prototype(prototype: &Value) {
    let Some(obj) = prototype.as_object() else { return };
    let mut obj = obj.borrow_mut();
    obj.set_own("name", string("Error"));
    obj.set_own("message", string(""));
    obj.set_own("toString", native_function("toString", 0, to_string_fn, None));
}

fn to_string_fn(this: &Value, _: &[Value], _: &mut Interpreter) -> crate::error::JsResult<Value> {
    let obj = this.as_object();
    let name = obj.and_then(|o| o.borrow().get_own("name")).map(|v| to_js_string(&v)).unwrap_or_else(|| "Error".to_string());
    let message = obj.and_then(|o| o.borrow().get_own("message")).map(|v| to_js_string(&v)).unwrap_or_default();
    if message.is_empty() {
        Ok(string(name))
    } else {
        Ok(string(format!("{}: {}", name, message)))
    }
}

/// Builds `{ name, message, stack }` objects, shared by every native
/// constructor below and by `Interpreter::throw_type_error`/friends.
pub fn make_error_instance(name: &str, message: &str, prototype: &Value) -> Value {
    let obj = value_object(Object::with_prototype(Some(prototype.clone())));
    if let Some(o) = obj.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("name", string(name.to_string()));
        o.set_own("message", string(message.to_string()));
        o.set_own("stack", string(format!("{}: {}", name, message)));
    }
    obj
}

/// Writes `message`/`stack` onto `this` when called via `new` (the fresh
/// instance construct() hands in is already chained to the right
/// prototype); falls back to building a standalone instance off the
/// generic `Error.prototype` when called bare (`TypeError("x")` with no
/// `new`) — a native function can't close over its own subtype
/// prototype, since `NativeFunction` is a bare `fn` pointer, not a
/// closure.
fn ctor_body(this: &Value, args: &[Value], interp: &mut Interpreter, name: &str) -> crate::error::JsResult<Value> {
    let message = args.get(0).map(to_js_string).unwrap_or_default();
    if let Some(obj) = this.as_object() {
        {
            let mut obj = obj.borrow_mut();
            obj.set_own("message", string(message.clone()));
            obj.set_own("stack", string(format!("{}: {}", name, message)));
        }
        Ok(this.clone())
    } else {
        Ok(make_error_instance(name, &message, &interp.realm.error_prototype))
    }
}

fn error_ctor(this: &Value, args: &[Value], interp: &mut Interpreter) -> crate::error::JsResult<Value> {
    ctor_body(this, args, interp, "Error")
}

fn type_error_ctor(this: &Value, args: &[Value], interp: &mut Interpreter) -> crate::error::JsResult<Value> {
    ctor_body(this, args, interp, "TypeError")
}

fn range_error_ctor(this: &Value, args: &[Value], interp: &mut Interpreter) -> crate::error::JsResult<Value> {
    ctor_body(this, args, interp, "RangeError")
}

fn reference_error_ctor(this: &Value, args: &[Value], interp: &mut Interpreter) -> crate::error::JsResult<Value> {
    ctor_body(this, args, interp, "ReferenceError")
}

fn syntax_error_ctor(this: &Value, args: &[Value], interp: &mut Interpreter) -> crate::error::JsResult<Value> {
    ctor_body(this, args, interp, "SyntaxError")
}

fn uri_error_ctor(this: &Value, args: &[Value], interp: &mut Interpreter) -> crate::error::JsResult<Value> {
    ctor_body(this, args, interp, "URIError")
}

fn make_constructor(name: &str, f: crate::object::NativeFunction, prototype: Value, function_prototype: &Value) -> Value {
    let ctor = value_object(Object::native_function(name, 1, f, Some(function_prototype.clone())));
    if let Some(obj) = ctor.as_object() {
        let mut obj = obj.borrow_mut();
        obj.set_own("prototype", prototype.clone());
        obj.set_own("name", string(name.to_string()));
    }
    if let Some(proto_obj) = prototype.as_object() {
        proto_obj.borrow_mut().set_own("constructor", ctor.clone());
    }
    ctor
}

/// Builds `globalThis.Error` (and the `TypeError`/`RangeError`/etc.
/// constructors, each with its own prototype chained off `Error.prototype`)
/// as callable objects usable both with and without `new`.
pub fn create_error_constructors(function_prototype: &Value, error_prototype: &Value) -> Vec<(&'static str, Value)> {
    let mut out = Vec::new();
    out.push(("Error", make_constructor("Error", error_ctor, error_prototype.clone(), function_prototype)));

    let subtypes: [(&'static str, crate::object::NativeFunction); 5] = [
        ("TypeError", type_error_ctor),
        ("RangeError", range_error_ctor),
        ("ReferenceError", reference_error_ctor),
        ("SyntaxError", syntax_error_ctor),
        ("URIError", uri_error_ctor),
    ];
    for (name, f) in subtypes {
        let subtype_prototype = value_object(Object::with_prototype(Some(error_prototype.clone())));
        if let Some(p) = subtype_prototype.as_object() {
            p.borrow_mut().set_own("name", string(name));
        }
        out.push((name, make_constructor(name, f, subtype_prototype, function_prototype)));
    }
    out
}

/// Constructs a `JsError` of `kind` wrapping a fresh error instance whose
/// `message` is `message`, ready to be the error value of an abrupt
/// completion.
pub fn new_error(kind: JsErrorKind, message: impl Into<String>, error_prototype: &Value) -> JsError {
    let instance = make_error_instance(kind.name(), &message.into(), error_prototype);
    JsError::new(kind, instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::{HostConfig, Realm};
    use crate::value::string as value_string;

    fn interp() -> Interpreter {
        Interpreter::new(Realm::new(&HostConfig::default()))
    }

    #[test]
    fn to_string_fn_omits_the_colon_when_message_is_empty() {
        let mut i = interp();
        let err = make_error_instance("TypeError", "", &i.realm.error_prototype.clone());
        let result = to_string_fn(&err, &[], &mut i).unwrap();
        assert_eq!(to_js_string(&result), "TypeError");
    }

    #[test]
    fn to_string_fn_joins_name_and_message_with_a_colon() {
        let mut i = interp();
        let err = make_error_instance("RangeError", "out of bounds", &i.realm.error_prototype.clone());
        let result = to_string_fn(&err, &[], &mut i).unwrap();
        assert_eq!(to_js_string(&result), "RangeError: out of bounds");
    }

    #[test]
    fn make_error_instance_sets_name_message_and_stack() {
        let prototype = value_object(Object::new());
        let err = make_error_instance("SyntaxError", "bad token", &prototype);
        let obj = err.as_object().unwrap().borrow();
        assert_eq!(to_js_string(&obj.get_own("name").unwrap()), "SyntaxError");
        assert_eq!(to_js_string(&obj.get_own("message").unwrap()), "bad token");
        assert_eq!(to_js_string(&obj.get_own("stack").unwrap()), "SyntaxError: bad token");
    }

    #[test]
    fn ctor_called_with_new_writes_message_onto_the_provided_instance() {
        let mut i = interp();
        let prototype = value_object(Object::new());
        let instance = value_object(Object::with_prototype(Some(prototype)));
        let result = type_error_ctor(&instance, &[value_string("nope".to_string())], &mut i).unwrap();
        assert!(result.as_object().is_some());
        let message = instance.as_object().unwrap().borrow().get_own("message").unwrap();
        assert_eq!(to_js_string(&message), "nope");
    }

    #[test]
    fn ctor_called_without_new_builds_a_standalone_instance() {
        let mut i = interp();
        let result = range_error_ctor(&crate::value::undefined(), &[value_string("bad range".to_string())], &mut i).unwrap();
        let obj = result.as_object().unwrap().borrow();
        assert_eq!(to_js_string(&obj.get_own("name").unwrap()), "RangeError");
        assert_eq!(to_js_string(&obj.get_own("message").unwrap()), "bad range");
    }

    #[test]
    fn create_error_constructors_chains_each_subtype_prototype_to_error_prototype() {
        let function_prototype = value_object(Object::native_function("noop", 0, |_, _, _| Ok(crate::value::undefined()), None));
        let error_prototype = value_object(Object::new());
        install_error_prototype(&error_prototype);
        let constructors = create_error_constructors(&function_prototype, &error_prototype);
        assert_eq!(constructors.len(), 6);
        let (_, type_error_ctor_value) = constructors.iter().find(|(name, _)| *name == "TypeError").unwrap();
        let subtype_prototype = type_error_ctor_value.as_object().unwrap().borrow().get_own("prototype").unwrap();
        let subtype_proto_obj = subtype_prototype.as_object().unwrap().borrow();
        assert_eq!(to_js_string(&subtype_proto_obj.get_own("name").unwrap()), "TypeError");
        let back_ref = subtype_proto_obj.get_own("constructor").unwrap();
        assert!(back_ref.as_object().unwrap().borrow().get_own("name").is_some());
    }

    #[test]
    fn new_error_builds_a_js_error_carrying_the_message_on_its_instance() {
        let error_prototype = value_object(Object::new());
        let js_error = new_error(JsErrorKind::Type, "boom", &error_prototype);
        let message = js_error.value.as_object().unwrap().borrow().get_own("message").unwrap();
        assert_eq!(to_js_string(&message), "boom");
    }
}
