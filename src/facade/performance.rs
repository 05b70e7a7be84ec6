//! `performance` (§4.B), grounded on `window.py`'s `Performance`/
//! `pmemory`. `now()` needs a real monotonic clock the GC-traced value
//! model can't hold directly (`std::time::Instant` isn't `Trace`), so it
//! lives behind `InternalState` the same way `RegexState` tunnels
//! `regress::Regex` through it.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{native_function, InternalState, Object, ObjectInitializer};
use crate::value::{number, object as value_object, string, Value};
use rand::Rng;
use std::time::Instant;

struct Clock {
    start: Instant,
}

fn build_memory(is_mobile: bool) -> Value {
    let limit: u64 = if is_mobile { 512 * 1024 * 1024 } else { 4 * 1024 * 1024 * 1024 };
    let mut rng = rand::thread_rng();
    let total = (limit as f64 * (rng.gen::<f64>() * 0.045 + 0.005)) as u64;
    let used = (total as f64 * (rng.gen::<f64>() * 0.15 + 0.8)) as u64;
    let obj = value_object(Object::new());
    if let Some(o) = obj.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("jsHeapSizeLimit", number(limit as f64));
        o.set_own("totalJSHeapSize", number(total as f64));
        o.set_own("usedJSHeapSize", number(used as f64));
    }
    obj
}

pub fn build(platform: &str, function_prototype: &Value) -> Value {
    let time_origin = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0);

    let navigation = value_object(Object::new());
    if let Some(o) = navigation.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("redirectCount", number(0.0));
        o.set_own("type", number(1.0));
    }
    let timing = value_object(Object::new());
    if let Some(o) = timing.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("navigationStart", number(time_origin));
        o.set_own("loadEventEnd", number(time_origin));
        o.set_own("domComplete", number(time_origin));
    }
    let event_counts = value_object(Object::new());
    if let Some(o) = event_counts.as_object() {
        o.borrow_mut().set_own("size", number(0.0));
    }

    let clock_holder = value_object(Object::with_native_state(Clock { start: Instant::now() }, None));

    ObjectInitializer::new(Some(function_prototype.clone()))
        .property("timeOrigin", number(time_origin))
        .property("memory", build_memory(platform == "Android"))
        .property("navigation", navigation)
        .property("timing", timing)
        .property("eventCounts", event_counts)
        .property("onresourcetimingbufferfull", crate::value::null())
        .property("__clock", clock_holder)
        .function("now", 0, now, Some(function_prototype.clone()))
        .build_value()
}

fn now(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let elapsed = this
        .as_object()
        .and_then(|o| o.borrow().get_own("__clock"))
        .and_then(|v| v.as_object().and_then(|o| o.borrow().native_state().and_then(|s| s.with_ref::<Clock, f64>(|c| c.start.elapsed().as_secs_f64() * 1000.0))));
    Ok(number(elapsed.unwrap_or(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::{HostConfig, Realm};
    use crate::value::{to_number, ValueExt};

    fn dummy_function_prototype() -> Value {
        value_object(Object::native_function("noop", 0, |_, _, _| Ok(crate::value::undefined()), None))
    }

    #[test]
    fn now_returns_a_nonnegative_elapsed_millisecond_count() {
        let mut i = Interpreter::new(Realm::new(&HostConfig::default()));
        let perf = build("Win32", &dummy_function_prototype());
        let result = now(&perf, &[], &mut i).unwrap();
        assert!(to_number(&result) >= 0.0);
    }

    #[test]
    fn mobile_memory_limit_is_smaller_than_desktop() {
        let mobile = build_memory(true);
        let desktop = build_memory(false);
        let mobile_limit = mobile.as_object().unwrap().borrow().get_own("jsHeapSizeLimit").unwrap();
        let desktop_limit = desktop.as_object().unwrap().borrow().get_own("jsHeapSizeLimit").unwrap();
        assert!(to_number(&mobile_limit) < to_number(&desktop_limit));
    }

    #[test]
    fn time_origin_is_a_plausible_unix_millisecond_timestamp() {
        let perf = build("Win32", &dummy_function_prototype());
        let origin = perf.as_object().unwrap().borrow().get_own("timeOrigin").unwrap();
        assert!(to_number(&origin) > 1_000_000_000_000.0);
        let _ = perf.is_object();
    }
}
