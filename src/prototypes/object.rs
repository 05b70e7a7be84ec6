use crate::interpreter::Interpreter;
use crate::object::ObjectInitializer;
use crate::value::{boolean, object as value_object, string, undefined, Value, ValueExt};
use crate::error::JsResult;
use crate::object::Object;

pub fn install_object_prototype(prototype: &Value) {
    let Some(obj) = prototype.as_object() else { return };
    let mut obj = obj.borrow_mut();
    obj.set_own("hasOwnProperty", crate::object::native_function("hasOwnProperty", 1, has_own_property, None));
    obj.set_own("toString", crate::object::native_function("toString", 0, to_string, None));
    obj.set_own("valueOf", crate::object::native_function("valueOf", 0, value_of, None));
    obj.set_own("isPrototypeOf", crate::object::native_function("isPrototypeOf", 1, is_prototype_of, None));
}

fn has_own_property(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let key = args.get(0).map(crate::value::to_js_string).unwrap_or_default();
    Ok(boolean(this.as_object().map(|o| o.borrow().has_own(&key)).unwrap_or(false)))
}

fn to_string(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let tag = if this.as_object().map(|o| o.borrow().is_array()).unwrap_or(false) {
        "Array"
    } else if this.as_object().map(|o| o.borrow().is_callable()).unwrap_or(false) {
        "Function"
    } else {
        "Object"
    };
    Ok(string(format!("[object {}]", tag)))
}

fn value_of(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(this.clone())
}

fn is_prototype_of(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let Some(target) = args.get(0).and_then(|v| v.as_object()) else {
        return Ok(boolean(false));
    };
    let mut current = target.borrow().prototype().cloned();
    while let Some(p) = current {
        if crate::value::strict_equals(&p, this) {
            return Ok(boolean(true));
        }
        current = p.as_object().and_then(|o| o.borrow().prototype().cloned());
    }
    Ok(boolean(false))
}

/// `Object.keys`/`values`/`entries`/`assign`/`create`/`freeze`, exposed as
/// the `Object` global constructor-like namespace.
pub fn create_object_namespace(object_prototype: &Value, function_prototype: &Value) -> Value {
    ObjectInitializer::new(Some(function_prototype.clone()))
        .property("prototype", object_prototype.clone())
        .function("keys", 1, keys, Some(function_prototype.clone()))
        .function("values", 1, values, Some(function_prototype.clone()))
        .function("entries", 1, entries, Some(function_prototype.clone()))
        .function("assign", 2, assign, Some(function_prototype.clone()))
        .function("freeze", 1, freeze, Some(function_prototype.clone()))
        .function("create", 2, create, Some(function_prototype.clone()))
        .function("getPrototypeOf", 1, get_prototype_of, Some(function_prototype.clone()))
        .build_value()
}

fn keys(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let keys: Vec<String> = args.get(0).and_then(|v| v.as_object()).map(|o| o.borrow().own_keys()).unwrap_or_default();
    Ok(make_string_array(keys))
}

fn values(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let Some(obj) = args.get(0).and_then(|v| v.as_object()) else { return Ok(make_array(vec![])) };
    let vals: Vec<Value> = obj.borrow().own_keys().into_iter().map(|k| obj.borrow().get_own(&k).unwrap_or_else(undefined)).collect();
    Ok(make_array(vals))
}

fn entries(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let Some(obj) = args.get(0).and_then(|v| v.as_object()) else { return Ok(make_array(vec![])) };
    let pairs: Vec<Value> = obj
        .borrow()
        .own_keys()
        .into_iter()
        .map(|k| {
            let v = obj.borrow().get_own(&k).unwrap_or_else(undefined);
            make_array(vec![string(k), v])
        })
        .collect();
    Ok(make_array(pairs))
}

fn assign(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let Some(target) = args.get(0).and_then(|v| v.as_object()) else { return Ok(undefined()) };
    for source in args.iter().skip(1) {
        if let Some(src) = source.as_object() {
            let keys = src.borrow().own_keys();
            for k in keys {
                let v = src.borrow().get_own(&k).unwrap_or_else(undefined);
                target.borrow_mut().set_own(k, v);
            }
        }
    }
    Ok(args[0].clone())
}

fn freeze(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    // Freezing is a no-op beyond returning the argument: nothing in this
    // crate observes the extensible/frozen distinction on writes yet.
    Ok(args.get(0).cloned().unwrap_or_else(undefined))
}

fn create(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let proto = args.get(0).filter(|v| v.is_object()).cloned();
    let obj = value_object(Object::with_prototype(proto));
    if let Some(props) = args.get(1).and_then(|v| v.as_object()) {
        let keys = props.borrow().own_keys();
        for k in keys {
            let descriptor = props.borrow().get_own(&k);
            if let Some(value) = descriptor.as_ref().and_then(|d| d.as_object()).and_then(|d| d.borrow().get_own("value")) {
                obj.as_object().unwrap().borrow_mut().set_own(k, value);
            }
        }
    }
    Ok(obj)
}

fn get_prototype_of(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(args
        .get(0)
        .and_then(|v| v.as_object())
        .and_then(|o| o.borrow().prototype().cloned())
        .unwrap_or_else(crate::value::null))
}

pub(crate) fn make_array(items: Vec<Value>) -> Value {
    let arr = value_object(Object::array(None));
    if let Some(obj) = arr.as_object() {
        let mut obj = obj.borrow_mut();
        for (i, v) in items.iter().enumerate() {
            obj.set_own(i.to_string(), v.clone());
        }
        obj.set_array_length(items.len() as u32);
    }
    arr
}

pub(crate) fn make_string_array(items: Vec<String>) -> Value {
    make_array(items.into_iter().map(string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::{HostConfig, Realm};
    use crate::value::to_js_string;

    fn interp() -> Interpreter {
        Interpreter::new(Realm::new(&HostConfig::default()))
    }

    fn plain_object(i: &mut Interpreter) -> Value {
        value_object(Object::with_prototype(Some(i.realm.object_prototype.clone())))
    }

    #[test]
    fn has_own_property_true_for_set_key_false_otherwise() {
        let mut i = interp();
        let o = plain_object(&mut i);
        o.as_object().unwrap().borrow_mut().set_own("x", string("y".to_string()));
        assert_eq!(crate::value::to_boolean(&has_own_property(&o, &[string("x".to_string())], &mut i).unwrap()), true);
        assert_eq!(crate::value::to_boolean(&has_own_property(&o, &[string("nope".to_string())], &mut i).unwrap()), false);
    }

    #[test]
    fn is_prototype_of_walks_the_chain() {
        let mut i = interp();
        let grandparent = plain_object(&mut i);
        let parent = value_object(Object::with_prototype(Some(grandparent.clone())));
        let child = value_object(Object::with_prototype(Some(parent.clone())));
        let result = is_prototype_of(&grandparent, &[child], &mut i).unwrap();
        assert_eq!(crate::value::to_boolean(&result), true);
    }

    #[test]
    fn keys_values_entries_preserve_insertion_order() {
        let mut i = interp();
        let o = plain_object(&mut i);
        o.as_object().unwrap().borrow_mut().set_own("b", string("2".to_string()));
        o.as_object().unwrap().borrow_mut().set_own("a", string("1".to_string()));
        let ks = keys(&undefined(), &[o.clone()], &mut i).unwrap();
        let ks_obj = ks.as_object().unwrap();
        let ks_obj = ks_obj.borrow();
        assert_eq!(to_js_string(&ks_obj.get_own("0").unwrap()), "b");
        assert_eq!(to_js_string(&ks_obj.get_own("1").unwrap()), "a");
    }

    #[test]
    fn assign_copies_own_keys_from_sources_onto_target() {
        let mut i = interp();
        let target = plain_object(&mut i);
        let source = plain_object(&mut i);
        source.as_object().unwrap().borrow_mut().set_own("k", string("v".to_string()));
        assign(&undefined(), &[target.clone(), source], &mut i).unwrap();
        let v = target.as_object().unwrap().borrow().get_own("k").unwrap();
        assert_eq!(to_js_string(&v), "v");
    }

    #[test]
    fn get_prototype_of_returns_null_for_prototypeless_object() {
        let mut i = interp();
        let o = value_object(Object::with_prototype(None));
        let p = get_prototype_of(&undefined(), &[o], &mut i).unwrap();
        assert!(p.is_null());
    }
}
