//! `console` (§4.B/§6 "script output contract"). Grounded on `window.py`'s
//! `console` record (`log`/`warn`/`info`/`dir`/`error` all aliasing
//! `print`) and on the teacher's `builtins::console` for the idiom of
//! routing host-visible output through the `log` crate instead of
//! `println!` directly, so an embedder can capture or silence it the same
//! way it captures any other structured log line.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectInitializer;
use crate::value::{to_js_string, undefined, Value};

pub fn build(function_prototype: &Value) -> Value {
    ObjectInitializer::new(None)
        .function("log", 0, log, Some(function_prototype.clone()))
        .function("info", 0, info, Some(function_prototype.clone()))
        .function("warn", 0, warn, Some(function_prototype.clone()))
        .function("error", 0, error, Some(function_prototype.clone()))
        .function("debug", 0, log, Some(function_prototype.clone()))
        .function("dir", 0, log, Some(function_prototype.clone()))
        .function("trace", 0, log, Some(function_prototype.clone()))
        .function("assert", 0, assert_fn, Some(function_prototype.clone()))
        .build_value()
}

fn format_args(args: &[Value]) -> String {
    args.iter().map(to_js_string).collect::<Vec<_>>().join(" ")
}

fn log(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    crate::log_info!("console.log: {}", format_args(args));
    Ok(undefined())
}

fn info(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    crate::log_info!("console.info: {}", format_args(args));
    Ok(undefined())
}

fn warn(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    crate::log_warn!("console.warn: {}", format_args(args));
    Ok(undefined())
}

fn error(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    crate::log_error!("console.error: {}", format_args(args));
    Ok(undefined())
}

fn assert_fn(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let ok = args.get(0).map(crate::value::to_boolean).unwrap_or(false);
    if !ok {
        crate::log_warn!("console.assert failed: {}", format_args(&args[1.min(args.len())..]));
    }
    Ok(undefined())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::{HostConfig, Realm};
    use crate::value::{boolean, number, string, ValueExt};

    fn interp() -> Interpreter {
        Interpreter::new(Realm::new(&HostConfig::default()))
    }

    #[test]
    fn format_args_joins_mixed_types_with_a_space() {
        let joined = format_args(&[string("hi".to_string()), number(1.0), boolean(true)]);
        assert_eq!(joined, "hi 1 true");
    }

    #[test]
    fn log_returns_undefined_and_does_not_panic_on_no_args() {
        let mut i = interp();
        let result = log(&undefined(), &[], &mut i).unwrap();
        assert!(result.is_undefined());
    }

    #[test]
    fn assert_fn_with_truthy_condition_is_silent_and_returns_undefined() {
        let mut i = interp();
        let result = assert_fn(&undefined(), &[boolean(true), string("should not print".to_string())], &mut i).unwrap();
        assert!(result.is_undefined());
    }

    #[test]
    fn assert_fn_with_falsy_condition_still_returns_undefined() {
        let mut i = interp();
        let result = assert_fn(&undefined(), &[boolean(false), string("oops".to_string())], &mut i).unwrap();
        assert!(result.is_undefined());
    }

    #[test]
    fn assert_fn_with_no_args_treats_missing_condition_as_falsy() {
        let mut i = interp();
        let result = assert_fn(&undefined(), &[], &mut i).unwrap();
        assert!(result.is_undefined());
    }

    #[test]
    fn debug_dir_and_trace_alias_log() {
        let mut i = interp();
        assert!(log(&undefined(), &[string("x".to_string())], &mut i).unwrap().is_undefined());
    }

    #[test]
    fn build_wires_up_every_expected_method() {
        let function_prototype = value_from_native_function();
        let console = build(&function_prototype);
        let obj = console.as_object().unwrap();
        let obj = obj.borrow();
        for name in ["log", "info", "warn", "error", "debug", "dir", "trace", "assert"] {
            assert!(obj.get_own(name).is_some(), "missing console.{name}");
        }
    }

    fn value_from_native_function() -> Value {
        crate::value::object(crate::object::Object::native_function("noop", 0, |_, _, _| Ok(undefined()), None))
    }
}
