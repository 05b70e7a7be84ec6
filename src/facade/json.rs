//! `JSON.parse`/`JSON.stringify` (§4.B), bridging `Value` through
//! `serde_json::Value`. Grounded on `window.py`'s `JSON` class, whose
//! `stringify` is meant to produce compact separators with no spaces —
//! the original passes `separators=(':', ',')` to `json.dumps`, which
//! actually swaps Python's (item, key) separator order and would emit
//! garbled output; this crate just uses `serde_json`'s default compact
//! writer (`,`/`:` with no spaces), which is what the swapped call was
//! clearly meant to produce.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{Object, ObjectInitializer};
use crate::value::{boolean, null, number, object as value_object, string, to_js_string, undefined, Value, ValueExt};
use serde_json::Value as Json;

pub fn build(function_prototype: &Value) -> Value {
    ObjectInitializer::new(None)
        .function("parse", 1, parse, Some(function_prototype.clone()))
        .function("stringify", 3, stringify, Some(function_prototype.clone()))
        .build_value()
}

fn parse(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let text = args.get(0).map(to_js_string).unwrap_or_default();
    match serde_json::from_str::<Json>(&text) {
        Ok(json) => Ok(json_to_value(&json)),
        Err(e) => Err(crate::error::JsError::new(crate::error::JsErrorKind::Syntax, string(format!("Unexpected token in JSON: {}", e)))),
    }
}

fn stringify(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let Some(v) = args.get(0) else { return Ok(undefined()) };
    match value_to_json(v) {
        Some(json) => Ok(string(serde_json::to_string(&json).unwrap_or_default())),
        None => Ok(undefined()),
    }
}

/// `undefined`/functions serialize as omitted object members or `null`
/// array slots, matching `JSON.stringify`'s real behaviour.
pub fn value_to_json(value: &Value) -> Option<Json> {
    if value.is_undefined() {
        return None;
    }
    if value.is_null() {
        return Some(Json::Null);
    }
    if value.is_boolean() {
        return Some(Json::Bool(crate::value::to_boolean(value)));
    }
    if value.is_number() {
        let n = crate::value::to_number(value);
        return Some(serde_json::Number::from_f64(n).map(Json::Number).unwrap_or(Json::Null));
    }
    if value.is_string() {
        return Some(Json::String(to_js_string(value)));
    }
    if let Some(obj) = value.as_object() {
        let obj_ref = obj.borrow();
        if obj_ref.is_callable() {
            return None;
        }
        if obj_ref.is_array() {
            let len = obj_ref.array_length();
            let items: Vec<Json> = (0..len)
                .map(|i| obj_ref.get_own(&i.to_string()).and_then(|v| value_to_json(&v)).unwrap_or(Json::Null))
                .collect();
            return Some(Json::Array(items));
        }
        let mut map = serde_json::Map::new();
        for key in obj_ref.own_keys() {
            if let Some(v) = obj_ref.get_own(&key) {
                if let Some(j) = value_to_json(&v) {
                    map.insert(key, j);
                }
            }
        }
        return Some(Json::Object(map));
    }
    None
}

pub fn json_to_value(json: &Json) -> Value {
    match json {
        Json::Null => null(),
        Json::Bool(b) => boolean(*b),
        Json::Number(n) => number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => string(s.clone()),
        Json::Array(items) => crate::prototypes::array::make_array(items.iter().map(json_to_value).collect()),
        Json::Object(map) => {
            let obj = value_object(Object::new());
            if let Some(o) = obj.as_object() {
                let mut o = o.borrow_mut();
                for (k, v) in map {
                    o.set_own(k.clone(), json_to_value(v));
                }
            }
            obj
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::{HostConfig, Realm};

    fn interp() -> Interpreter {
        Interpreter::new(Realm::new(&HostConfig::default()))
    }

    #[test]
    fn stringify_uses_compact_separators() {
        let mut i = interp();
        let obj = value_object(Object::new());
        obj.as_object().unwrap().borrow_mut().set_own("a", number(1.0));
        obj.as_object().unwrap().borrow_mut().set_own("b", number(2.0));
        let result = stringify(&crate::value::undefined(), &[obj], &mut i).unwrap();
        assert_eq!(to_js_string(&result), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn stringify_omits_undefined_object_members() {
        let mut i = interp();
        let obj = value_object(Object::new());
        obj.as_object().unwrap().borrow_mut().set_own("a", undefined());
        obj.as_object().unwrap().borrow_mut().set_own("b", number(2.0));
        let result = stringify(&crate::value::undefined(), &[obj], &mut i).unwrap();
        assert_eq!(to_js_string(&result), r#"{"b":2}"#);
    }

    #[test]
    fn parse_then_stringify_roundtrips_nested_structures() {
        let mut i = interp();
        let parsed = parse(&crate::value::undefined(), &[string(r#"{"x":[1,2,"y"]}"#.to_string())], &mut i).unwrap();
        let back = stringify(&crate::value::undefined(), &[parsed], &mut i).unwrap();
        assert_eq!(to_js_string(&back), r#"{"x":[1,2,"y"]}"#);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        let mut i = interp();
        assert!(parse(&crate::value::undefined(), &[string("{not json".to_string())], &mut i).is_err());
    }

    #[test]
    fn stringify_on_undefined_argument_yields_undefined() {
        let mut i = interp();
        let result = stringify(&crate::value::undefined(), &[undefined()], &mut i).unwrap();
        assert!(result.is_undefined());
    }
}
