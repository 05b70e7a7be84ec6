//! `chrome` (§4.B), grounded method-for-method on `window.py`'s
//! `CHROME_DATA` nested-dict literal.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{Object, ObjectInitializer};
use crate::value::{boolean, null, number, object as value_object, string, Value};

fn string_enum(pairs: &[(&str, &str)]) -> Value {
    let obj = value_object(Object::new());
    if let Some(o) = obj.as_object() {
        let mut o = o.borrow_mut();
        for (k, v) in pairs {
            o.set_own(*k, string(*v));
        }
    }
    obj
}

fn native_code(_: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string("[native code]"))
}

fn csi(_: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let start = start_e();
    let obj = value_object(Object::new());
    if let Some(o) = obj.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("startE", number(start));
        o.set_own("onloadT", number(start + 281.0));
        o.set_own("pageT", number(3947.235));
        o.set_own("tran", number(15.0));
    }
    Ok(obj)
}

fn load_times(_: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let start = start_e() / 1000.0;
    let obj = value_object(Object::new());
    if let Some(o) = obj.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("requestTime", number(start));
        o.set_own("startLoadTime", number(start));
        o.set_own("commitLoadTime", number(start + 0.324));
        o.set_own("finishDocumentLoadTime", number(start + 0.498));
        o.set_own("finishLoadTime", number(start + 0.534));
        o.set_own("firstPaintTime", number(start + 0.437));
        o.set_own("firstPaintAfterLoadTime", number(0.0));
        o.set_own("navigationType", string("Other"));
        o.set_own("wasFetchedViaSpdy", boolean(true));
        o.set_own("wasNpnNegotiated", boolean(true));
        o.set_own("npnNegotiatedProtocol", string("h3"));
        o.set_own("wasAlternateProtocolAvailable", boolean(false));
        o.set_own("connectionInfo", string("h3"));
    }
    Ok(obj)
}

fn start_e() -> f64 {
    std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).map(|d| d.as_millis() as f64).unwrap_or(0.0)
}

pub fn build(function_prototype: &Value) -> Value {
    let app = ObjectInitializer::new(None)
        .property("InstallState", string_enum(&[("DISABLED", "disabled"), ("INSTALLED", "installed"), ("NOT_INSTALLED", "not_installed")]))
        .property("RunningState", string_enum(&[("CANNOT_RUN", "cannot_run"), ("READY_TO_RUN", "ready_to_run"), ("RUNNING", "running")]))
        .property("isInstalled", boolean(false))
        .function("getDetails", 0, native_code, Some(function_prototype.clone()))
        .function("getIsInstalled", 0, native_code, Some(function_prototype.clone()))
        .function("installState", 0, native_code, Some(function_prototype.clone()))
        .function("runningState", 0, native_code, Some(function_prototype.clone()))
        .build_value();

    let runtime = ObjectInitializer::new(None)
        .property(
            "OnInstalledReason",
            string_enum(&[
                ("CHROME_UPDATE", "chrome_update"),
                ("INSTALL", "install"),
                ("SHARED_MODULE_UPDATE", "shared_module_update"),
                ("UPDATE", "update"),
            ]),
        )
        .property(
            "OnRestartRequiredReason",
            string_enum(&[("APP_UPDATE", "app_update"), ("OS_UPDATE", "os_update"), ("PERIODIC", "periodic")]),
        )
        .property(
            "PlatformArch",
            string_enum(&[
                ("ARM", "arm"),
                ("ARM64", "arm64"),
                ("MIPS", "mips"),
                ("MIPS64", "mips64"),
                ("X86_32", "x86-32"),
                ("X86_64", "x86-64"),
            ]),
        )
        .property(
            "PlatformOs",
            string_enum(&[
                ("ANDROID", "android"),
                ("CROS", "cros"),
                ("FUCHSIA", "fuchsia"),
                ("LINUX", "linux"),
                ("MAC", "mac"),
                ("OPENBSD", "openbsd"),
                ("WIN", "win"),
            ]),
        )
        .property(
            "RequestUpdateCheckStatus",
            string_enum(&[("NO_UPDATE", "no_update"), ("THROTTLED", "throttled"), ("UPDATE_AVAILABLE", "update_available")]),
        )
        .property("id", null())
        .function("connect", 0, native_code, Some(function_prototype.clone()))
        .function("sendMessage", 0, native_code, Some(function_prototype.clone()))
        .build_value();

    ObjectInitializer::new(None)
        .property("app", app)
        .property("runtime", runtime)
        .function("csi", 0, csi, Some(function_prototype.clone()))
        .function("loadTimes", 0, load_times, Some(function_prototype.clone()))
        .build_value()
}
