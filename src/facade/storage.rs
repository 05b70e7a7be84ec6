//! `localStorage`/`sessionStorage` (§4.B). The original backs these with
//! a plain Python dict per `Window` instance; here the dict lives behind
//! `InternalState` the same way `performance.rs`'s clock does, since a
//! `HashMap<String, String>` has no reason to be GC-traced.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{InternalState, Object, ObjectInitializer};
use crate::value::{null, number, string, to_js_string, undefined, Value, ValueExt};
use std::collections::HashMap;

struct Backing(HashMap<String, String>);

fn with_backing<R>(this: &Value, f: impl FnOnce(&mut HashMap<String, String>) -> R) -> Option<R> {
    this.as_object().and_then(|o| o.borrow().native_state().and_then(|s| s.with_mut::<Backing, R>(|b| f(&mut b.0))))
}

fn get_item(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let key = args.get(0).map(to_js_string).unwrap_or_default();
    Ok(with_backing(this, |b| b.get(&key).cloned()).flatten().map(string).unwrap_or_else(null))
}

fn set_item(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let key = args.get(0).map(to_js_string).unwrap_or_default();
    let value = args.get(1).map(to_js_string).unwrap_or_default();
    with_backing(this, |b| {
        b.insert(key, value);
    });
    Ok(undefined())
}

fn remove_item(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let key = args.get(0).map(to_js_string).unwrap_or_default();
    with_backing(this, |b| {
        b.remove(&key);
    });
    Ok(undefined())
}

fn clear(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    with_backing(this, |b| b.clear());
    Ok(undefined())
}

fn key(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let index = args.get(0).map(crate::value::to_number).unwrap_or(0.0) as usize;
    Ok(with_backing(this, |b| b.keys().nth(index).cloned()).flatten().map(string).unwrap_or_else(null))
}

fn length(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(with_backing(this, |b| b.len()).unwrap_or(0) as f64))
}

pub fn build(function_prototype: &Value) -> Value {
    let storage = ObjectInitializer::new(Some(function_prototype.clone()))
        .function("getItem", 1, get_item, Some(function_prototype.clone()))
        .function("setItem", 2, set_item, Some(function_prototype.clone()))
        .function("removeItem", 1, remove_item, Some(function_prototype.clone()))
        .function("clear", 0, clear, Some(function_prototype.clone()))
        .function("key", 1, key, Some(function_prototype.clone()))
        .function("length", 0, length, Some(function_prototype.clone()))
        .build_value();
    if let Some(o) = storage.as_object() {
        o.borrow_mut().set_native_state(InternalState::new(Backing(HashMap::new())));
    }
    storage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::{HostConfig, Realm};

    fn interp() -> Interpreter {
        Interpreter::new(Realm::new(&HostConfig::default()))
    }

    fn dummy_function_prototype() -> Value {
        crate::value::object(Object::native_function("noop", 0, |_, _, _| Ok(undefined()), None))
    }

    #[test]
    fn set_then_get_item_round_trips() {
        let mut i = interp();
        let storage = build(&dummy_function_prototype());
        set_item(&storage, &[string("k".to_string()), string("v".to_string())], &mut i).unwrap();
        let result = get_item(&storage, &[string("k".to_string())], &mut i).unwrap();
        assert_eq!(to_js_string(&result), "v");
    }

    #[test]
    fn get_item_on_missing_key_returns_null() {
        let mut i = interp();
        let storage = build(&dummy_function_prototype());
        let result = get_item(&storage, &[string("missing".to_string())], &mut i).unwrap();
        assert!(result.is_null());
    }

    #[test]
    fn remove_item_deletes_the_entry() {
        let mut i = interp();
        let storage = build(&dummy_function_prototype());
        set_item(&storage, &[string("k".to_string()), string("v".to_string())], &mut i).unwrap();
        remove_item(&storage, &[string("k".to_string())], &mut i).unwrap();
        let result = get_item(&storage, &[string("k".to_string())], &mut i).unwrap();
        assert!(result.is_null());
    }

    #[test]
    fn clear_empties_all_entries_and_length_reflects_count() {
        let mut i = interp();
        let storage = build(&dummy_function_prototype());
        set_item(&storage, &[string("a".to_string()), string("1".to_string())], &mut i).unwrap();
        set_item(&storage, &[string("b".to_string()), string("2".to_string())], &mut i).unwrap();
        assert_eq!(crate::value::to_number(&length(&storage, &[], &mut i).unwrap()), 2.0);
        clear(&storage, &[], &mut i).unwrap();
        assert_eq!(crate::value::to_number(&length(&storage, &[], &mut i).unwrap()), 0.0);
    }
}
