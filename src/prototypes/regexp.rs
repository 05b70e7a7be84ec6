//! `RegExp.prototype` and `RegExp` construction, grounded on the teacher's
//! `builtins::regexp` (`Regex` stored as opaque state since `regress::Regex`
//! isn't `Trace`, same reasoning the teacher gives for its own
//! `unsafe impl Trace for RegExp { empty_trace!(); }`).

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{native_function, InternalState, Object, ObjectKind};
use crate::value::{boolean, null, number, object as value_object, string, to_js_string, undefined, Value, ValueExt};
use regress::Regex;

pub struct RegexState {
    pub matcher: Regex,
    pub source: String,
    pub flags: String,
    pub global: bool,
    pub sticky: bool,
}

pub fn construct(pattern: &str, flags: &str, prototype: &Value) -> JsResult<Value> {
    let matcher = Regex::with_flags(pattern, flags)
        .map_err(|_| crate::error::JsError::new(crate::error::JsErrorKind::Syntax, string(format!("Invalid regular expression: /{}/{}", pattern, flags))))?;
    let state = RegexState {
        matcher,
        source: pattern.to_string(),
        flags: flags.to_string(),
        global: flags.contains('g'),
        sticky: flags.contains('y'),
    };
    let obj = Object::with_kind(ObjectKind::Regex(InternalState::new(state)), Some(prototype.clone()));
    let value = value_object(obj);
    if let Some(o) = value.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("lastIndex", number(0.0));
        o.set_own("source", string(pattern.to_string()));
        o.set_own("flags", string(flags.to_string()));
        o.set_own("global", boolean(flags.contains('g')));
        o.set_own("ignoreCase", boolean(flags.contains('i')));
        o.set_own("multiline", boolean(flags.contains('m')));
        o.set_own("sticky", boolean(flags.contains('y')));
    }
    Ok(value)
}

pub fn install_regexp_prototype(prototype: &Value) {
    let Some(obj) = prototype.as_object() else { return };
    let mut obj = obj.borrow_mut();
    obj.set_own("test", native_function("test", 1, test, None));
    obj.set_own("exec", native_function("exec", 1, exec, None));
    obj.set_own("toString", native_function("toString", 0, to_string_fn, None));
}

fn start_index(this: &Value) -> usize {
    this.as_object()
        .and_then(|o| o.borrow().get_own("lastIndex"))
        .map(|v| crate::value::to_number(&v).max(0.0) as usize)
        .unwrap_or(0)
}

fn set_last_index(this: &Value, index: usize) {
    if let Some(o) = this.as_object() {
        o.borrow_mut().set_own("lastIndex", number(index as f64));
    }
}

fn uses_last_index(this: &Value) -> bool {
    this.as_object()
        .map(|o| {
            let o = o.borrow();
            o.regex_state().and_then(|s| s.with_ref::<RegexState, bool>(|r| r.global || r.sticky)).unwrap_or(false)
        })
        .unwrap_or(false)
}

fn test(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let result = exec(this, args, interp)?;
    Ok(boolean(!result.is_null()))
}

fn exec(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let input = args.get(0).map(to_js_string).unwrap_or_default();
    let start = if uses_last_index(this) { start_index(this) } else { 0 };
    if start > input.len() {
        set_last_index(this, 0);
        return Ok(null());
    }
    let Some(obj) = this.as_object() else { return Ok(null()) };
    let matched = {
        let obj = obj.borrow();
        let Some(state) = obj.regex_state() else { return Ok(null()) };
        state.with_ref::<RegexState, Option<(usize, usize, Vec<Option<(usize, usize)>>)>>(|r| {
            r.matcher.find_from(&input, start).next().map(|m| {
                let groups = (0..m.captures.len())
                    .map(|i| m.group(i + 1))
                    .collect::<Vec<_>>();
                (m.range().start, m.range().end, groups)
            })
        })
    };
    match matched.flatten() {
        None => {
            if uses_last_index(this) {
                set_last_index(this, 0);
            }
            Ok(null())
        }
        Some((start, end, groups)) => {
            if uses_last_index(this) {
                set_last_index(this, end);
            }
            let mut items = vec![string(input[start..end].to_string())];
            for g in groups {
                items.push(match g {
                    Some((s, e)) => string(input[s..e].to_string()),
                    None => undefined(),
                });
            }
            let result = crate::prototypes::array::make_array(items);
            if let Some(o) = result.as_object() {
                let mut o = o.borrow_mut();
                o.set_own("index", number(start as f64));
                o.set_own("input", string(input.clone()));
            }
            Ok(result)
        }
    }
}

fn to_string_fn(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let obj = this.as_object();
    let source = obj.and_then(|o| o.borrow().get_own("source")).map(|v| to_js_string(&v)).unwrap_or_default();
    let flags = obj.and_then(|o| o.borrow().get_own("flags")).map(|v| to_js_string(&v)).unwrap_or_default();
    Ok(string(format!("/{}/{}", source, flags)))
}

/// `globalThis.RegExp`, usable both as `new RegExp(pattern, flags)` and
/// bare `RegExp(pattern, flags)` — a plain pattern string with no flags
/// defaults `flags` to `""`, matching a regex literal with none.
fn regexp_ctor(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let pattern = args.get(0).map(to_js_string).unwrap_or_default();
    let flags = args.get(1).map(to_js_string).unwrap_or_default();
    construct(&pattern, &flags, &interp.realm.regexp_prototype)
}

pub fn create_regexp_constructor(function_prototype: &Value, regexp_prototype: &Value) -> Value {
    let ctor = value_object(Object::native_function("RegExp", 2, regexp_ctor, Some(function_prototype.clone())));
    if let Some(obj) = ctor.as_object() {
        let mut obj = obj.borrow_mut();
        obj.set_own("prototype", regexp_prototype.clone());
        obj.set_own("name", string("RegExp"));
    }
    if let Some(proto_obj) = regexp_prototype.as_object() {
        proto_obj.borrow_mut().set_own("constructor", ctor.clone());
    }
    ctor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::{HostConfig, Realm};

    fn interp() -> Interpreter {
        Interpreter::new(Realm::new(&HostConfig::default()))
    }

    #[test]
    fn test_matches_against_input() {
        let mut i = interp();
        let re = construct("ab+c", "", &i.realm.regexp_prototype).unwrap();
        let result = test(&re, &[string("xxabbbcxx".to_string())], &mut i).unwrap();
        assert_eq!(crate::value::to_boolean(&result), true);
    }

    #[test]
    fn exec_returns_null_on_no_match() {
        let mut i = interp();
        let re = construct("zzz", "", &i.realm.regexp_prototype).unwrap();
        let result = exec(&re, &[string("abc".to_string())], &mut i).unwrap();
        assert!(result.is_null());
    }

    #[test]
    fn exec_advances_last_index_when_global() {
        let mut i = interp();
        let re = construct("a", "g", &i.realm.regexp_prototype).unwrap();
        let input = string("aaa".to_string());
        exec(&re, &[input.clone()], &mut i).unwrap();
        assert_eq!(start_index(&re), 1);
        exec(&re, &[input], &mut i).unwrap();
        assert_eq!(start_index(&re), 2);
    }

    #[test]
    fn to_string_includes_source_and_flags() {
        let mut i = interp();
        let re = construct("a+", "gi", &i.realm.regexp_prototype).unwrap();
        let result = to_string_fn(&re, &[], &mut i).unwrap();
        assert_eq!(to_js_string(&result), "/a+/gi");
    }

    #[test]
    fn construct_rejects_invalid_pattern() {
        let i = interp();
        assert!(construct("(", "", &i.realm.regexp_prototype).is_err());
    }
}
