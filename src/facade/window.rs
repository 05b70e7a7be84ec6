//! Assembles the global `window`/`globalThis`/`self`/`parent` record
//! (§4.B), grounded on `examples/original_source/window.py`'s
//! `Window.__init__`/`_init_env`. Every other `facade` submodule builds
//! one piece; this is the one place that wires them all onto
//! `realm.global_object`/`realm.global_environment` and performs the
//! reflective self-aliasing the original does by assigning its own
//! environment dict back into itself under four names.

use crate::object::{native_function, ObjectInitializer};
use crate::prototypes;
use crate::realm::{HostConfig, Realm};
use crate::value::{boolean, null, number, string, undefined, Value};

use super::{chrome, console, crypto, document, encoding, json, location, math, navigator, performance, screen, storage, timers, url_utils, worker};

/// Every `on*` global event handler slot the original seeds with `None`.
/// A script can read/assign any of these; none of them fire on their own
/// since there's no real rendering/input pipeline behind them (§1
/// Non-goals), but `window.addEventListener`/`dispatchEvent` still work
/// through the shared listener map (`document::add_event_listener`).
const WINDOW_EVENT_HANDLERS: &[&str] = &[
    "onabort", "onafterprint", "onanimationend", "onanimationiteration", "onanimationstart", "onappinstalled", "onauxclick",
    "onbeforeinput", "onbeforeinstallprompt", "onbeforematch", "onbeforeprint", "onbeforetoggle", "onbeforeunload",
    "onbeforexrselect", "onblur", "oncancel", "oncanplay", "oncanplaythrough", "onchange", "onclick", "onclose", "oncommand",
    "oncontentvisibilityautostatechange", "oncontextlost", "oncontextmenu", "oncontextrestored", "oncuechange", "ondblclick",
    "ondevicemotion", "ondeviceorientation", "ondeviceorientationabsolute", "ondrag", "ondragend", "ondragenter", "ondragleave",
    "ondragover", "ondragstart", "ondrop", "ondurationchange", "onemptied", "onended", "onerror", "onfocus", "onformdata",
    "ongotpointercapture", "onhashchange", "oninput", "oninvalid", "onkeydown", "onkeypress", "onkeyup", "onlanguagechange",
    "onload", "onloadeddata", "onloadedmetadata", "onloadstart", "onlostpointercapture", "onmessage", "onmessageerror",
    "onmousedown", "onmouseenter", "onmouseleave", "onmousemove", "onmouseout", "onmouseover", "onmouseup", "onmousewheel",
    "onoffline", "ononline", "onpagehide", "onpagereveal", "onpageshow", "onpageswap", "onpause", "onplay", "onplaying",
    "onpointercancel", "onpointerdown", "onpointerenter", "onpointerleave", "onpointermove", "onpointerout", "onpointerover",
    "onpointerrawupdate", "onpointerup", "onpopstate", "onprogress", "onratechange", "onrejectionhandled", "onreset",
    "onresize", "onscroll", "onscrollend", "onscrollsnapchange", "onscrollsnapchanging", "onsearch", "onsecuritypolicyviolation",
    "onseeked", "onseeking", "onselect", "onselectionchange", "onselectstart", "onslotchange", "onstalled", "onstorage",
    "onsubmit", "onsuspend", "ontimeupdate", "ontoggle", "ontransitioncancel", "ontransitionend", "ontransitionrun",
    "ontransitionstart", "onunhandledrejection", "onunload", "onvolumechange", "onwaiting", "onwebkitanimationend",
    "onwebkitanimationiteration", "onwebkitanimationstart", "onwebkittransitionend",
];

fn date_now(_: &Value, _: &[Value], _: &mut crate::interpreter::Interpreter) -> crate::error::JsResult<Value> {
    use std::time::{SystemTime, UNIX_EPOCH};
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as f64).unwrap_or(0.0);
    Ok(number(millis))
}

fn build_date(function_prototype: &Value) -> Value {
    ObjectInitializer::new(Some(function_prototype.clone())).function("now", 0, date_now, Some(function_prototype.clone())).build_value()
}

/// Trivial `fetch` stub: the original doesn't model network I/O at all
/// (§1 Non-goals: no real network stack), so a call rejects immediately
/// with a `TypeError` rather than hanging forever on a promise this
/// interpreter has no event loop to ever settle.
fn fetch(_: &Value, _: &[Value], interp: &mut crate::interpreter::Interpreter) -> crate::error::JsResult<Value> {
    interp.throw_type_error("fetch is not supported in this environment")
}

pub fn install(realm: &mut Realm, config: &HostConfig) {
    let function_prototype = realm.function_prototype.clone();
    let object_prototype = realm.object_prototype.clone();
    let array_prototype = realm.array_prototype.clone();
    let string_prototype = realm.string_prototype.clone();
    let number_prototype = realm.number_prototype.clone();
    let regexp_prototype = realm.regexp_prototype.clone();
    let error_prototype = realm.error_prototype.clone();
    let byte_array_prototype = realm.byte_array_prototype.clone();

    let resolution = screen::pick_resolution();
    let platform = config.platform.clone().unwrap_or_else(|| "Win32".to_string());

    realm.define_global("chrome", chrome::build(&function_prototype));
    realm.define_global("console", console::build(&function_prototype));
    realm.define_global("crypto", crypto::build(&function_prototype));

    realm.define_global("atob", native_function("atob", 1, url_utils::atob, Some(function_prototype.clone())));
    realm.define_global("btoa", native_function("btoa", 1, url_utils::btoa, Some(function_prototype.clone())));
    realm.define_global("encodeURI", native_function("encodeURI", 1, url_utils::encode_uri, Some(function_prototype.clone())));
    realm.define_global("encodeURIComponent", native_function("encodeURIComponent", 1, url_utils::encode_uri_component, Some(function_prototype.clone())));
    realm.define_global("decodeURI", native_function("decodeURI", 1, url_utils::decode_uri, Some(function_prototype.clone())));
    realm.define_global("decodeURIComponent", native_function("decodeURIComponent", 1, url_utils::decode_uri_component, Some(function_prototype.clone())));
    realm.define_global("escape", native_function("escape", 1, url_utils::escape, Some(function_prototype.clone())));
    realm.define_global("unescape", native_function("unescape", 1, url_utils::unescape, Some(function_prototype.clone())));
    realm.define_global("parseInt", native_function("parseInt", 2, url_utils::parse_int, Some(function_prototype.clone())));
    realm.define_global("parseFloat", native_function("parseFloat", 1, url_utils::parse_float, Some(function_prototype.clone())));
    realm.define_global("eval", native_function("eval", 1, eval_stub, Some(function_prototype.clone())));

    realm.define_global("isSecureContext", boolean(config.domain.starts_with("https://")));
    realm.define_global("closed", boolean(false));
    realm.define_global("clientInformation", null());
    realm.define_global("innerHeight", number(resolution.inner_height as f64));
    realm.define_global("innerWidth", number(resolution.inner_width as f64));
    realm.define_global("outerHeight", number(resolution.outer_height as f64));
    realm.define_global("outerWidth", number(resolution.outer_width as f64));
    realm.define_global("devicePixelRatio", number(1.0));
    realm.define_global("length", number(0.0));
    realm.define_global("name", string(""));
    realm.define_global("locationbar", object_with_visible(&object_prototype));
    realm.define_global("statusbar", object_with_visible(&object_prototype));
    realm.define_global("scrollbars", object_with_visible(&object_prototype));
    realm.define_global("offscreenBuffering", boolean(true));
    realm.define_global("pageXOffset", number(0.0));
    realm.define_global("pageYOffset", number(0.0));
    realm.define_global("scrollX", number(0.0));
    realm.define_global("scrollY", number(0.0));
    realm.define_global("origin", string(config.domain.trim_end_matches('/').to_string()));
    realm.define_global("indexedDB", null());
    realm.define_global("event", null());
    realm.define_global("NaN", number(f64::NAN));
    realm.define_global("undefined", undefined());

    realm.define_global("location", location::build(&config.domain, &function_prototype));
    realm.define_global("navigator", navigator::build(config, &function_prototype));
    realm.define_global("screen", screen::build(&resolution, &function_prototype));
    realm.define_global("performance", performance::build(&platform, &function_prototype));
    realm.define_global("localStorage", storage::build(&function_prototype));
    realm.define_global("sessionStorage", storage::build(&function_prototype));

    realm.define_global("Math", math::build(&function_prototype));
    realm.define_global("JSON", json::build(&function_prototype));
    realm.define_global("Date", build_date(&function_prototype));
    realm.define_global("fetch", native_function("fetch", 1, fetch, Some(function_prototype.clone())));

    realm.define_global("Object", prototypes::create_object_namespace(&object_prototype, &function_prototype));
    realm.define_global("Array", prototypes::create_array_constructor(&function_prototype, &array_prototype));
    realm.define_global("String", prototypes::create_string_constructor(&function_prototype, &string_prototype));
    realm.define_global("Number", prototypes::create_number_constructor(&function_prototype, &number_prototype));
    realm.define_global("RegExp", prototypes::create_regexp_constructor(&function_prototype, &regexp_prototype));

    for (name, ctor) in prototypes::create_error_constructors(&function_prototype, &error_prototype) {
        realm.define_global(name, ctor);
    }
    for (name, ctor) in prototypes::create_typed_array_constructors(&function_prototype, &byte_array_prototype) {
        realm.define_global(name, ctor);
    }

    let (text_encoder, text_decoder) = encoding::build(&function_prototype);
    realm.define_global("TextEncoder", text_encoder);
    realm.define_global("TextDecoder", text_decoder);

    let (blob_ctor, worker_ctor) = worker::build(&function_prototype, &object_prototype);
    realm.define_global("Blob", blob_ctor);
    realm.define_global("Worker", worker_ctor);

    timers::install(realm);
    document::install(realm);

    realm.define_global("addEventListener", native_function("addEventListener", 2, document::add_event_listener, Some(function_prototype.clone())));
    realm.define_global("removeEventListener", native_function("removeEventListener", 2, document::remove_event_listener, Some(function_prototype.clone())));
    realm.define_global("dispatchEvent", native_function("dispatchEvent", 1, document::dispatch_event, Some(function_prototype.clone())));

    for handler in WINDOW_EVENT_HANDLERS {
        realm.define_global(handler, null());
    }

    // The original closes its `_init_env` by folding its own freshly built
    // environment dict back into itself under four names — `window`,
    // `globalThis`, `self`, and `parent` every property lookup sees
    // resolves to the very global record holding that alias. Here the
    // global object already *is* that one record (see `Realm::new`), so
    // aliasing is just binding four more names to it.
    let global = realm.global_object.clone();
    realm.define_global("window", global.clone());
    realm.define_global("globalThis", global.clone());
    realm.define_global("self", global.clone());
    realm.define_global("parent", global);
}

fn object_with_visible(object_prototype: &Value) -> Value {
    ObjectInitializer::new(Some(object_prototype.clone())).property("visible", boolean(true)).build_value()
}

/// `eval` is intentionally not a real re-entrant parse-and-run (no access
/// to the source text of whatever called it, nor a parser exposed to this
/// module); scripts that probe for `eval`'s existence see a callable that
/// throws rather than `undefined`.
fn eval_stub(_: &Value, _: &[Value], interp: &mut crate::interpreter::Interpreter) -> crate::error::JsResult<Value> {
    interp.throw_type_error("eval is not supported in this environment")
}
