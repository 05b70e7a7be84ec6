//! `String.prototype`, grounded method-for-method on
//! `examples/original_source/js_properties.py`'s `string_prototype`.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{native_function, Object};
use crate::value::{boolean, number, object as value_object, string, to_js_string, to_number, undefined, Value, ValueExt};
use regress::Regex;

fn this_str(this: &Value) -> String {
    to_js_string(this)
}

pub fn install_string_prototype(prototype: &Value) {
    let Some(obj) = prototype.as_object() else { return };
    let mut obj = obj.borrow_mut();
    macro_rules! f {
        ($name:literal, $arity:literal, $func:ident) => {
            obj.set_own($name, native_function($name, $arity, $func, None));
        };
    }
    f!("charAt", 1, char_at);
    f!("charCodeAt", 1, char_code_at);
    f!("codePointAt", 1, char_code_at);
    f!("includes", 1, includes);
    f!("indexOf", 1, index_of);
    f!("lastIndexOf", 1, last_index_of);
    f!("startsWith", 1, starts_with);
    f!("endsWith", 1, ends_with);
    f!("slice", 2, slice);
    f!("substring", 2, substring);
    f!("substr", 2, substr);
    f!("toLowerCase", 0, to_lower_case);
    f!("toUpperCase", 0, to_upper_case);
    f!("toLocaleLowerCase", 0, to_lower_case);
    f!("toLocaleUpperCase", 0, to_upper_case);
    f!("trim", 0, trim);
    f!("trimStart", 0, trim_start);
    f!("trimEnd", 0, trim_end);
    f!("repeat", 1, repeat);
    f!("padStart", 2, pad_start);
    f!("padEnd", 2, pad_end);
    f!("split", 2, split);
    f!("replace", 2, replace);
    f!("replaceAll", 2, replace_all);
    f!("match", 1, match_fn);
    f!("matchAll", 1, match_all);
    f!("search", 1, search);
    f!("concat", 1, concat);
    f!("toString", 0, to_string_fn);
    f!("valueOf", 0, to_string_fn);
}

fn char_at(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let index = args.get(0).map(to_number).unwrap_or(0.0) as i64;
    if index < 0 {
        return Ok(string(""));
    }
    Ok(s.chars().nth(index as usize).map(|c| string(c.to_string())).unwrap_or_else(|| string("")))
}

fn char_code_at(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let index = args.get(0).map(to_number).unwrap_or(0.0) as i64;
    if index < 0 {
        return Ok(number(f64::NAN));
    }
    Ok(s.chars().nth(index as usize).map(|c| number(c as u32 as f64)).unwrap_or(number(f64::NAN)))
}

fn includes(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let needle = args.get(0).map(to_js_string).unwrap_or_default();
    Ok(boolean(s.contains(&needle)))
}

fn index_of(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let needle = args.get(0).map(to_js_string).unwrap_or_default();
    match s.find(&needle) {
        Some(byte_idx) => Ok(number(s[..byte_idx].chars().count() as f64)),
        None => Ok(number(-1.0)),
    }
}

fn last_index_of(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let needle = args.get(0).map(to_js_string).unwrap_or_default();
    match s.rfind(&needle) {
        Some(byte_idx) => Ok(number(s[..byte_idx].chars().count() as f64)),
        None => Ok(number(-1.0)),
    }
}

fn starts_with(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let needle = args.get(0).map(to_js_string).unwrap_or_default();
    Ok(boolean(s.starts_with(&needle)))
}

fn ends_with(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let needle = args.get(0).map(to_js_string).unwrap_or_default();
    Ok(boolean(s.ends_with(&needle)))
}

fn char_range(s: &str, start: f64, end: Option<f64>) -> (usize, usize) {
    let len = s.chars().count();
    let clamp = |n: f64| -> usize {
        if n < 0.0 {
            (len as f64 + n).max(0.0) as usize
        } else {
            (n as usize).min(len)
        }
    };
    let start = clamp(start);
    let end = end.map(clamp).unwrap_or(len);
    (start, end)
}

fn substring_of(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end.saturating_sub(start)).collect()
}

fn slice(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let start = args.get(0).map(to_number).unwrap_or(0.0);
    let end = args.get(1).map(to_number);
    let (start, end) = char_range(&s, start, end);
    if start >= end {
        return Ok(string(""));
    }
    Ok(string(substring_of(&s, start, end)))
}

fn substring(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let len = s.chars().count();
    let a = args.get(0).map(to_number).unwrap_or(0.0).max(0.0) as usize;
    let b = args.get(1).map(to_number).map(|n| n.max(0.0) as usize).unwrap_or(len);
    let (start, end) = (a.min(b).min(len), a.max(b).min(len));
    Ok(string(substring_of(&s, start, end)))
}

fn substr(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let len = s.chars().count();
    let start = {
        let n = args.get(0).map(to_number).unwrap_or(0.0);
        if n < 0.0 {
            (len as f64 + n).max(0.0) as usize
        } else {
            (n as usize).min(len)
        }
    };
    let count = args.get(1).map(to_number).map(|n| n.max(0.0) as usize).unwrap_or(len - start);
    Ok(string(substring_of(&s, start, start + count)))
}

fn to_lower_case(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(this_str(this).to_lowercase()))
}

fn to_upper_case(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(this_str(this).to_uppercase()))
}

fn trim(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(this_str(this).trim().to_string()))
}

fn trim_start(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(this_str(this).trim_start().to_string()))
}

fn trim_end(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(this_str(this).trim_end().to_string()))
}

fn repeat(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let count = args.get(0).map(to_number).unwrap_or(0.0);
    if count < 0.0 || !count.is_finite() {
        return interp.throw_range_error("Invalid count value");
    }
    Ok(string(this_str(this).repeat(count as usize)))
}

fn pad_start(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let target_len = args.get(0).map(to_number).unwrap_or(0.0) as usize;
    let pad = args.get(1).map(to_js_string).unwrap_or_else(|| " ".to_string());
    Ok(string(pad_to(&s, target_len, &pad, true)))
}

fn pad_end(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let target_len = args.get(0).map(to_number).unwrap_or(0.0) as usize;
    let pad = args.get(1).map(to_js_string).unwrap_or_else(|| " ".to_string());
    Ok(string(pad_to(&s, target_len, &pad, false)))
}

fn pad_to(s: &str, target_len: usize, pad: &str, at_start: bool) -> String {
    let len = s.chars().count();
    if len >= target_len || pad.is_empty() {
        return s.to_string();
    }
    let needed = target_len - len;
    let fill: String = pad.chars().cycle().take(needed).collect();
    if at_start {
        format!("{}{}", fill, s)
    } else {
        format!("{}{}", s, fill)
    }
}

fn split(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let parts: Vec<String> = match args.get(0) {
        None => vec![s],
        Some(sep) => {
            let sep = to_js_string(sep);
            if sep.is_empty() {
                s.chars().map(|c| c.to_string()).collect()
            } else {
                s.split(&sep as &str).map(|p| p.to_string()).collect()
            }
        }
    };
    Ok(crate::prototypes::array::make_array(parts.into_iter().map(string).collect()))
}

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern).ok()
}

fn replace(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let pattern = args.get(0).map(to_js_string).unwrap_or_default();
    let replacement = args.get(1).map(to_js_string).unwrap_or_default();
    if let Some(re) = compile(&pattern) {
        if let Some(m) = re.find(&s) {
            let mut out = String::new();
            out.push_str(&s[..m.range().start]);
            out.push_str(&replacement);
            out.push_str(&s[m.range().end..]);
            return Ok(string(out));
        }
        return Ok(string(s));
    }
    Ok(string(s.replacen(&pattern, &replacement, 1)))
}

fn replace_all(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let pattern = args.get(0).map(to_js_string).unwrap_or_default();
    let replacement = args.get(1).map(to_js_string).unwrap_or_default();
    Ok(string(s.replace(&pattern, &replacement)))
}

fn match_fn(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let pattern = args.get(0).map(to_js_string).unwrap_or_default();
    let Some(re) = compile(&pattern) else { return Ok(crate::value::null()) };
    let matches: Vec<Value> = re.find_iter(&s).map(|m| string(s[m.range()].to_string())).collect();
    if matches.is_empty() {
        Ok(crate::value::null())
    } else {
        Ok(crate::prototypes::array::make_array(matches))
    }
}

/// `matchAll` returns an array of match objects (`[whole, ...groups]` each
/// carrying `index`/`input`, the same shape `RegExp.prototype.exec`
/// produces), one per non-overlapping match — unlike `match`, which only
/// returns the matched substrings.
fn match_all(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let pattern = args.get(0).map(to_js_string).unwrap_or_default();
    let Some(re) = compile(&pattern) else { return Ok(crate::prototypes::array::make_array(vec![])) };
    let results: Vec<Value> = re
        .find_iter(&s)
        .map(|m| {
            let mut items = vec![string(s[m.range()].to_string())];
            for i in 0..m.captures.len() {
                items.push(match m.group(i + 1) {
                    Some(r) => string(s[r].to_string()),
                    None => undefined(),
                });
            }
            let result = crate::prototypes::array::make_array(items);
            if let Some(o) = result.as_object() {
                let mut o = o.borrow_mut();
                o.set_own("index", number(m.range().start as f64));
                o.set_own("input", string(s.clone()));
            }
            result
        })
        .collect();
    Ok(crate::prototypes::array::make_array(results))
}

fn search(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = this_str(this);
    let pattern = args.get(0).map(to_js_string).unwrap_or_default();
    match compile(&pattern).and_then(|re| re.find(&s)) {
        Some(m) => Ok(number(s[..m.range().start].chars().count() as f64)),
        None => Ok(number(-1.0)),
    }
}

fn concat(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let mut s = this_str(this);
    for a in args {
        s.push_str(&to_js_string(a));
    }
    Ok(string(s))
}

fn to_string_fn(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(this_str(this)))
}

fn from_char_code(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s: String = args
        .iter()
        .filter_map(|v| char::from_u32(to_number(v) as u32))
        .collect();
    Ok(string(s))
}

/// `String(x)` coerces via `ToString`; `new String(x)` boxing is not
/// distinguished since nothing in this crate's scripts probes `typeof`
/// on a boxed string separately from a primitive one.
fn string_ctor(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(args.get(0).map(to_js_string).unwrap_or_default()))
}

pub fn create_string_constructor(function_prototype: &Value, string_prototype: &Value) -> Value {
    let ctor = value_object(Object::native_function("String", 1, string_ctor, Some(function_prototype.clone())));
    if let Some(obj) = ctor.as_object() {
        let mut obj = obj.borrow_mut();
        obj.set_own("prototype", string_prototype.clone());
        obj.set_own("name", string("String"));
        obj.set_own("fromCharCode", native_function("fromCharCode", 1, from_char_code, None));
    }
    if let Some(proto_obj) = string_prototype.as_object() {
        proto_obj.borrow_mut().set_own("constructor", ctor.clone());
    }
    ctor
}
