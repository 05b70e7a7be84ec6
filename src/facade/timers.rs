//! `setTimeout`/`setInterval`/`clearTimeout`/`clearInterval`/
//! `requestIdleCallback`/`cancelIdleCallback` (§4.E), grounded on
//! `window.py`'s `SetTimeout`/`SetInterval` classes — a daemon thread per
//! timer there, `Interpreter::timers`'s background threads here, same
//! shape. The callback itself never leaves this thread: see
//! `interpreter::timers::TimerQueue`.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::value::{number, to_number, undefined, Value, ValueExt};

fn set_timeout(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let Some(callback) = args.get(0).filter(|v| v.as_object().map(|o| o.borrow().is_callable()).unwrap_or(false)) else {
        return Ok(number(0.0));
    };
    let delay = args.get(1).map(to_number).unwrap_or(0.0);
    let extra: Vec<Value> = args.iter().skip(2).cloned().collect();
    let id = interp.timers.set_timeout(callback.clone(), extra, delay);
    Ok(number(id as f64))
}

fn set_interval(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let Some(callback) = args.get(0).filter(|v| v.as_object().map(|o| o.borrow().is_callable()).unwrap_or(false)) else {
        return Ok(number(0.0));
    };
    let delay = args.get(1).map(to_number).unwrap_or(0.0);
    let extra: Vec<Value> = args.iter().skip(2).cloned().collect();
    let id = interp.timers.set_interval(callback.clone(), extra, delay);
    Ok(number(id as f64))
}

fn clear_timeout(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let id = args.get(0).map(to_number).unwrap_or(0.0);
    if id.is_finite() && id >= 0.0 {
        interp.timers.clear(id as u64);
    }
    Ok(undefined())
}

/// `requestIdleCallback`/`cancelIdleCallback` share `clearTimeout`'s queue:
/// the original fires its idle callback after a fixed budget with a
/// `{didTimeout, timeRemaining}` deadline record, which a one-shot timer
/// at a short fixed delay reproduces without a real idle-detection loop
/// (there's no real renderer here to ever be idle against, per Non-goals).
fn request_idle_callback(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let Some(callback) = args.get(0).filter(|v| v.as_object().map(|o| o.borrow().is_callable()).unwrap_or(false)) else {
        return Ok(number(0.0));
    };
    let deadline = build_deadline(interp);
    let id = interp.timers.set_timeout(callback.clone(), vec![deadline], 1.0);
    Ok(number(id as f64))
}

fn time_remaining(_: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(0.0))
}

fn build_deadline(interp: &mut Interpreter) -> Value {
    use crate::object::ObjectInitializer;
    ObjectInitializer::new(None)
        .property("didTimeout", crate::value::boolean(false))
        .function("timeRemaining", 0, time_remaining, Some(interp.realm.function_prototype.clone()))
        .build_value()
}

pub fn install(realm: &mut crate::realm::Realm) {
    use crate::object::native_function;
    realm.define_global("setTimeout", native_function("setTimeout", 1, set_timeout, Some(realm.function_prototype.clone())));
    realm.define_global("setInterval", native_function("setInterval", 1, set_interval, Some(realm.function_prototype.clone())));
    realm.define_global("clearTimeout", native_function("clearTimeout", 1, clear_timeout, Some(realm.function_prototype.clone())));
    realm.define_global("clearInterval", native_function("clearInterval", 1, clear_timeout, Some(realm.function_prototype.clone())));
    realm.define_global(
        "requestIdleCallback",
        native_function("requestIdleCallback", 1, request_idle_callback, Some(realm.function_prototype.clone())),
    );
    realm.define_global("cancelIdleCallback", native_function("cancelIdleCallback", 1, clear_timeout, Some(realm.function_prototype.clone())));
}
