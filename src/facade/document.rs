//! The `document` façade (§4.B): `Document`/`Element`/`ShadowRoot` plus
//! the `Event`/`MouseEvent` constructors, grounded on
//! `examples/original_source/document.py`. Elements are plain `Object`s
//! chained off a single shared `element_prototype` (§4.A's "virtual
//! dispatch" idiom applied to a façade object, not just a primitive) so
//! every element gets `setAttribute`/`addEventListener`/`toHTML`/etc. for
//! free rather than each carrying its own copies.
//!
//! Deviates from the original in one place: `createElement` returns a
//! *detached* node (`parentNode` null, not yet reachable from
//! `document`), matching the real DOM contract, instead of the Python
//! original's `createElement` which eagerly appends every element it
//! creates to the document regardless of whether the script ever calls
//! `appendChild`.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{native_function, Object, ObjectInitializer};
use crate::prototypes::array::make_array;
use crate::realm::{HostConfig, Realm};
use crate::value::{boolean, null, number, object as value_object, string, to_js_string, undefined, Value, ValueExt};

// ---------------------------------------------------------------------
// Shared listener map, used by Element, Document, and (from window.rs)
// the global object itself.
// ---------------------------------------------------------------------

fn listeners_of(target: &Value, event_type: &str) -> Vec<Value> {
    let Some(obj) = target.as_object() else { return Vec::new() };
    let Some(map) = obj.borrow().get_own("__listeners") else { return Vec::new() };
    let Some(map_obj) = map.as_object() else { return Vec::new() };
    let Some(list) = map_obj.borrow().get_own(event_type) else { return Vec::new() };
    let Some(list_obj) = list.as_object() else { return Vec::new() };
    let list_obj = list_obj.borrow();
    (0..list_obj.array_length()).filter_map(|i| list_obj.get_own(&i.to_string())).collect()
}

pub(crate) fn add_event_listener(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let event_type = args.get(0).map(to_js_string).unwrap_or_default();
    let Some(listener) = args.get(1).cloned().filter(|v| v.as_object().map(|o| o.borrow().is_callable()).unwrap_or(false)) else {
        return Ok(undefined());
    };
    let Some(obj) = this.as_object() else { return Ok(undefined()) };
    let map = obj.borrow().get_own("__listeners").unwrap_or_else(|| {
        let m = value_object(Object::new());
        obj.borrow_mut().set_own("__listeners", m.clone());
        m
    });
    if let Some(map_obj) = map.as_object() {
        let list = map_obj.borrow().get_own(&event_type).unwrap_or_else(|| make_array(vec![]));
        if let Some(list_obj) = list.as_object() {
            let len = list_obj.borrow().array_length();
            list_obj.borrow_mut().set_own(len.to_string(), listener);
        }
        map_obj.borrow_mut().set_own(event_type, list);
    }
    Ok(undefined())
}

pub(crate) fn remove_event_listener(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let event_type = args.get(0).map(to_js_string).unwrap_or_default();
    let Some(listener) = args.get(1).cloned() else { return Ok(undefined()) };
    let Some(obj) = this.as_object() else { return Ok(undefined()) };
    let Some(map) = obj.borrow().get_own("__listeners") else { return Ok(undefined()) };
    let Some(map_obj) = map.as_object() else { return Ok(undefined()) };
    let Some(list) = map_obj.borrow().get_own(&event_type) else { return Ok(undefined()) };
    let Some(list_obj) = list.as_object() else { return Ok(undefined()) };
    let remaining: Vec<Value> = {
        let list_obj = list_obj.borrow();
        (0..list_obj.array_length())
            .filter_map(|i| list_obj.get_own(&i.to_string()))
            .filter(|v| !crate::value::strict_equals(v, &listener))
            .collect()
    };
    let mut list_obj = list_obj.borrow_mut();
    for key in list_obj.own_keys() {
        if key != "length" {
            list_obj.delete_own(&key);
        }
    }
    for (i, v) in remaining.iter().enumerate() {
        list_obj.set_own(i.to_string(), v.clone());
    }
    list_obj.set_array_length(remaining.len() as u32);
    Ok(undefined())
}

/// Fires every listener registered for `event.type` plus the legacy
/// `on<type>` handler slot (when callable), in that order. Returns
/// `!defaultPrevented`, matching `EventTarget.dispatchEvent`'s return
/// value.
pub(crate) fn dispatch_event(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let Some(event) = args.get(0).cloned() else { return Ok(boolean(true)) };
    let event_type = event.as_object().and_then(|o| o.borrow().get_own("type")).map(|v| to_js_string(&v)).unwrap_or_default();
    if let Some(obj) = event.as_object() {
        let mut obj = obj.borrow_mut();
        obj.set_own("target", this.clone());
        obj.set_own("currentTarget", this.clone());
    }
    for listener in listeners_of(this, &event_type) {
        interp.call_value(&listener, this, &[event.clone()])?;
    }
    let on_handler_name = format!("on{}", event_type);
    if let Some(obj) = this.as_object() {
        let handler = obj.borrow().get_own(&on_handler_name);
        if let Some(cb) = handler.filter(|v| v.as_object().map(|o| o.borrow().is_callable()).unwrap_or(false)) {
            interp.call_value(&cb, this, &[event.clone()])?;
        }
    }
    let default_prevented = event.as_object().and_then(|o| o.borrow().get_own("defaultPrevented")).map(|v| crate::value::to_boolean(&v)).unwrap_or(false);
    Ok(boolean(!default_prevented))
}

// ---------------------------------------------------------------------
// Event / MouseEvent
// ---------------------------------------------------------------------

fn event_option(init: Option<&Value>, key: &str, default: Value) -> Value {
    init.and_then(|i| i.as_object()).and_then(|o| o.borrow().get_own(key)).unwrap_or(default)
}

fn event_ctor(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let event_type = args.get(0).map(to_js_string).unwrap_or_default();
    let init = args.get(1);
    if let Some(o) = this.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("type", string(event_type));
        o.set_own("bubbles", event_option(init, "bubbles", boolean(false)));
        o.set_own("cancelable", event_option(init, "cancelable", boolean(false)));
        o.set_own("defaultPrevented", boolean(false));
        o.set_own("target", null());
        o.set_own("currentTarget", null());
        o.set_own("eventPhase", number(0.0));
        o.set_own("isTrusted", boolean(false));
        o.set_own("timeStamp", number(0.0));
    }
    Ok(this.clone())
}

fn prevent_default(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    if let Some(o) = this.as_object() {
        let mut o = o.borrow_mut();
        let cancelable = o.get_own("cancelable").map(|v| crate::value::to_boolean(&v)).unwrap_or(false);
        if cancelable {
            o.set_own("defaultPrevented", boolean(true));
        }
    }
    Ok(undefined())
}

fn stop_propagation(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    if let Some(o) = this.as_object() {
        o.borrow_mut().set_own("__stopped", boolean(true));
    }
    Ok(undefined())
}

fn stop_immediate_propagation(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    if let Some(o) = this.as_object() {
        o.borrow_mut().set_own("__stoppedImmediate", boolean(true));
    }
    stop_propagation(this, args, interp)
}

fn mouse_event_ctor(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    event_ctor(this, args, interp)?;
    let init = args.get(1);
    let num = |key: &str| event_option(init, key, number(0.0));
    if let Some(o) = this.as_object() {
        let mut o = o.borrow_mut();
        for key in ["clientX", "clientY", "pageX", "pageY", "screenX", "screenY", "offsetX", "offsetY", "movementX", "movementY", "button", "buttons"] {
            o.set_own(key, num(key));
        }
        o.set_own("x", o.get_own("clientX").unwrap_or_else(|| number(0.0)));
        o.set_own("y", o.get_own("clientY").unwrap_or_else(|| number(0.0)));
        for key in ["ctrlKey", "shiftKey", "altKey", "metaKey"] {
            o.set_own(key, event_option(init, key, boolean(false)));
        }
        o.set_own("relatedTarget", event_option(init, "relatedTarget", null()));
    }
    Ok(this.clone())
}

/// Installs `Event`/`MouseEvent` as globals and builds the shared
/// `event_prototype`/`mouse_event_prototype` the constructors attach.
pub fn install(realm: &mut Realm) {
    let function_prototype = realm.function_prototype.clone();
    let event_prototype = realm.event_prototype.clone();
    if let Some(o) = event_prototype.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("preventDefault", native_function("preventDefault", 0, prevent_default, Some(function_prototype.clone())));
        o.set_own("stopPropagation", native_function("stopPropagation", 0, stop_propagation, Some(function_prototype.clone())));
        o.set_own("stopImmediatePropagation", native_function("stopImmediatePropagation", 0, stop_immediate_propagation, Some(function_prototype.clone())));
    }

    let event_ctor_value = native_function("Event", 2, event_ctor, Some(function_prototype.clone()));
    if let Some(o) = event_ctor_value.as_object() {
        o.borrow_mut().set_own("prototype", event_prototype.clone());
    }
    realm.define_global("Event", event_ctor_value);

    let mouse_event_prototype = value_object(Object::with_prototype(Some(event_prototype)));
    let mouse_event_ctor_value = native_function("MouseEvent", 2, mouse_event_ctor, Some(function_prototype.clone()));
    if let Some(o) = mouse_event_ctor_value.as_object() {
        o.borrow_mut().set_own("prototype", mouse_event_prototype);
    }
    realm.define_global("MouseEvent", mouse_event_ctor_value);

    install_element_prototype(realm);
    let doc = build_document(realm);
    realm.define_global("document", doc);
}

// ---------------------------------------------------------------------
// Element / ShadowRoot
// ---------------------------------------------------------------------

fn attribute_key(args: &[Value]) -> String {
    args.get(0).map(to_js_string).unwrap_or_default()
}

fn set_attribute(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let key = attribute_key(args);
    let value = args.get(1).map(to_js_string).unwrap_or_default();
    if let Some(o) = this.as_object() {
        let mut o = o.borrow_mut();
        let attrs = o.get_own("attributes").unwrap_or_else(|| value_object(Object::new()));
        if let Some(attrs_obj) = attrs.as_object() {
            attrs_obj.borrow_mut().set_own(key.clone(), string(value.clone()));
        }
        o.set_own("attributes", attrs);
        match key.as_str() {
            "class" => o.set_own("className", string(value)),
            "id" => o.set_own("id", string(value)),
            _ => {}
        }
    }
    Ok(undefined())
}

fn get_attribute(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let key = attribute_key(args);
    let attrs = this.as_object().and_then(|o| o.borrow().get_own("attributes"));
    Ok(attrs.and_then(|a| a.as_object().and_then(|o| o.borrow().get_own(&key))).unwrap_or_else(null))
}

fn remove_attribute(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let key = attribute_key(args);
    if let Some(attrs) = this.as_object().and_then(|o| o.borrow().get_own("attributes")) {
        if let Some(attrs_obj) = attrs.as_object() {
            attrs_obj.borrow_mut().delete_own(&key);
        }
    }
    Ok(undefined())
}

fn matches(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let selector = args.get(0).map(to_js_string).unwrap_or_default();
    Ok(boolean(element_matches(this, &selector)))
}

fn element_matches(element: &Value, selector: &str) -> bool {
    let Some(obj) = element.as_object() else { return false };
    let obj = obj.borrow();
    if let Some(id) = selector.strip_prefix('#') {
        return obj.get_own("id").map(|v| to_js_string(&v)) == Some(id.to_string());
    }
    if let Some(class) = selector.strip_prefix('.') {
        let class_name = obj.get_own("className").map(|v| to_js_string(&v)).unwrap_or_default();
        return class_name.split_whitespace().any(|c| c == class);
    }
    if let Some(inner) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        if let Some((attr_name, raw_value)) = inner.split_once('=') {
            let want = raw_value.trim_matches(|c| c == '"' || c == '\'');
            let attrs = obj.get_own("attributes");
            let got = attrs.and_then(|a| a.as_object().and_then(|o| o.borrow().get_own(attr_name))).map(|v| to_js_string(&v));
            return got.as_deref() == Some(want);
        }
        return false;
    }
    if selector == "*" {
        return true;
    }
    obj.get_own("tagName").map(|v| to_js_string(&v)).map(|t| t.eq_ignore_ascii_case(selector)).unwrap_or(false)
}

fn children_of(node: &Value) -> Vec<Value> {
    let Some(obj) = node.as_object() else { return Vec::new() };
    let Some(children) = obj.borrow().get_own("children") else { return Vec::new() };
    let Some(arr) = children.as_object() else { return Vec::new() };
    let arr = arr.borrow();
    (0..arr.array_length()).filter_map(|i| arr.get_own(&i.to_string())).collect()
}

fn find_first(node: &Value, pred: &impl Fn(&Value) -> bool) -> Option<Value> {
    for child in children_of(node) {
        if pred(&child) {
            return Some(child);
        }
        if let Some(found) = find_first(&child, pred) {
            return Some(found);
        }
    }
    None
}

fn find_all(node: &Value, pred: &impl Fn(&Value) -> bool, out: &mut Vec<Value>) {
    for child in children_of(node) {
        if pred(&child) {
            out.push(child.clone());
        }
        find_all(&child, pred, out);
    }
}

fn query_selector(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let selector = args.get(0).map(to_js_string).unwrap_or_default();
    Ok(find_first(this, &|el| element_matches(el, &selector)).unwrap_or_else(null))
}

fn query_selector_all(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let selector = args.get(0).map(to_js_string).unwrap_or_default();
    let mut out = Vec::new();
    find_all(this, &|el| element_matches(el, &selector), &mut out);
    Ok(make_array(out))
}

fn to_html(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(render_html(this)))
}

fn render_html(node: &Value) -> String {
    let Some(obj) = node.as_object() else { return String::new() };
    let obj = obj.borrow();
    let tag = obj.get_own("tagName").map(|v| to_js_string(&v)).unwrap_or_else(|| "DIV".to_string());
    let mut attrs = String::new();
    if let Some(attr_map) = obj.get_own("attributes").and_then(|v| v.as_object().cloned()) {
        let attr_map = attr_map.borrow();
        for key in attr_map.own_keys() {
            if let Some(v) = attr_map.get_own(&key) {
                attrs.push_str(&format!(" {}=\"{}\"", key, to_js_string(&v)));
            }
        }
    }
    let shadow_html = obj
        .get_own("shadowRoot")
        .filter(|_| obj.get_own("__shadowMode").map(|v| to_js_string(&v)) == Some("open".to_string()))
        .map(|root| render_children(&root))
        .unwrap_or_default();
    let inner = obj.get_own("innerHTML").map(|v| to_js_string(&v)).unwrap_or_default();
    let children_html = render_children(node);
    format!("<{tag}{attrs}>{shadow_html}{inner}{children_html}</{tag}>", tag = tag, attrs = attrs, shadow_html = shadow_html, inner = inner, children_html = children_html)
}

fn render_children(node: &Value) -> String {
    children_of(node).iter().map(render_html).collect::<Vec<_>>().join("")
}

fn focus(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let owner = this.as_object().and_then(|o| o.borrow().get_own("ownerDocument"));
    if let Some(doc) = owner {
        if let Some(doc_obj) = doc.as_object() {
            doc_obj.borrow_mut().set_own("activeElement", this.clone());
        }
        let handler = this.as_object().and_then(|o| o.borrow().get_own("onfocus"));
        if let Some(cb) = handler.filter(|v| v.as_object().map(|o| o.borrow().is_callable()).unwrap_or(false)) {
            interp.call_value(&cb, this, &[])?;
        }
        let event = value_object(Object::with_prototype(Some(interp.realm.event_prototype.clone())));
        event_ctor(&event, &[string("focus")], interp)?;
        dispatch_event(this, &[event], interp)?;
    }
    let _ = args;
    Ok(undefined())
}

fn blur(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let owner = this.as_object().and_then(|o| o.borrow().get_own("ownerDocument"));
    if let Some(doc) = owner {
        let is_active = doc.as_object().and_then(|o| o.borrow().get_own("activeElement")).map(|v| crate::value::strict_equals(&v, this)).unwrap_or(false);
        if is_active {
            if let Some(doc_obj) = doc.as_object() {
                doc_obj.borrow_mut().set_own("activeElement", null());
            }
            let handler = this.as_object().and_then(|o| o.borrow().get_own("onblur"));
            if let Some(cb) = handler.filter(|v| v.as_object().map(|o| o.borrow().is_callable()).unwrap_or(false)) {
                interp.call_value(&cb, this, &[])?;
            }
            let event = value_object(Object::with_prototype(Some(interp.realm.event_prototype.clone())));
            event_ctor(&event, &[string("blur")], interp)?;
            dispatch_event(this, &[event], interp)?;
        }
    }
    let _ = args;
    Ok(undefined())
}

fn attach_shadow(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let mode = args.get(0).and_then(|opts| opts.as_object()).and_then(|o| o.borrow().get_own("mode")).map(|v| to_js_string(&v)).unwrap_or_else(|| "open".to_string());
    let root = ObjectInitializer::new(Some(interp.realm.element_prototype.clone()))
        .property("host", this.clone())
        .property("mode", string(mode.clone()))
        .property("children", make_array(vec![]))
        .property("nodeType", number(11.0))
        .property("nodeName", string("#shadow-root"))
        .build_value();
    if let Some(o) = this.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("shadowRoot", root.clone());
        o.set_own("__shadowMode", string(mode));
    }
    Ok(root)
}

fn append_child(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let Some(node) = args.get(0).cloned() else { return Ok(undefined()) };
    if let Some(obj) = this.as_object() {
        let mut obj = obj.borrow_mut();
        let children = obj.get_own("children").unwrap_or_else(|| make_array(vec![]));
        if let Some(arr) = children.as_object() {
            let len = arr.borrow().array_length();
            arr.borrow_mut().set_own(len.to_string(), node.clone());
        }
        obj.set_own("children", children);
    }
    if let Some(node_obj) = node.as_object() {
        node_obj.borrow_mut().set_own("parentNode", this.clone());
    }
    Ok(node)
}

fn install_element_prototype(realm: &mut Realm) {
    let function_prototype = realm.function_prototype.clone();
    let proto = realm.element_prototype.clone();
    let Some(obj) = proto.as_object() else { return };
    let mut obj = obj.borrow_mut();
    macro_rules! f {
        ($name:literal, $arity:literal, $func:ident) => {
            obj.set_own($name, native_function($name, $arity, $func, Some(function_prototype.clone())));
        };
    }
    f!("setAttribute", 2, set_attribute);
    f!("getAttribute", 1, get_attribute);
    f!("removeAttribute", 1, remove_attribute);
    f!("addEventListener", 2, add_event_listener);
    f!("removeEventListener", 2, remove_event_listener);
    f!("dispatchEvent", 1, dispatch_event);
    f!("matches", 1, matches);
    f!("querySelector", 1, query_selector);
    f!("querySelectorAll", 1, query_selector_all);
    f!("toHTML", 0, to_html);
    f!("focus", 0, focus);
    f!("blur", 0, blur);
    f!("attachShadow", 1, attach_shadow);
    f!("appendChild", 1, append_child);
}

fn create_element(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let tag = args.get(0).map(to_js_string).unwrap_or_default();
    let el = ObjectInitializer::new(Some(interp.realm.element_prototype.clone()))
        .property("tagName", string(tag.to_uppercase()))
        .property("nodeName", string(tag.to_uppercase()))
        .property("nodeType", number(1.0))
        .property("id", string(""))
        .property("className", string(""))
        .property("attributes", value_object(Object::new()))
        .property("children", make_array(vec![]))
        .property("parentNode", null())
        .property("innerHTML", string(""))
        .property("style", value_object(Object::new()))
        .property("tabIndex", number(-1.0))
        .property("onfocus", null())
        .property("onblur", null())
        .property("ownerDocument", this.clone())
        .build_value();
    Ok(el)
}

fn get_element_by_id(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let id = args.get(0).map(to_js_string).unwrap_or_default();
    Ok(find_first(this, &|el| el.as_object().and_then(|o| o.borrow().get_own("id")).map(|v| to_js_string(&v)) == Some(id.clone())).unwrap_or_else(null))
}

fn get_elements_by_tag_name(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let tag = args.get(0).map(to_js_string).unwrap_or_default();
    let mut out = Vec::new();
    let pred = |el: &Value| {
        if tag == "*" {
            return true;
        }
        el.as_object().and_then(|o| o.borrow().get_own("tagName")).map(|v| to_js_string(&v)).map(|t| t.eq_ignore_ascii_case(&tag)).unwrap_or(false)
    };
    find_all(this, &pred, &mut out);
    Ok(make_array(out))
}

fn get_elements_by_name(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let name = args.get(0).map(to_js_string).unwrap_or_default();
    let mut out = Vec::new();
    let pred = |el: &Value| {
        let attrs = el.as_object().and_then(|o| o.borrow().get_own("attributes"));
        attrs.and_then(|a| a.as_object().and_then(|o| o.borrow().get_own("name"))).map(|v| to_js_string(&v)) == Some(name.clone())
    };
    find_all(this, &pred, &mut out);
    Ok(make_array(out))
}

fn doc_query_selector(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    query_selector(this, args, interp)
}

fn doc_query_selector_all(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    query_selector_all(this, args, interp)
}

fn doc_to_html(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(render_children(this)))
}

fn build_document(realm: &mut Realm) -> Value {
    let config: HostConfig = realm.host_config.clone();
    let function_prototype = realm.function_prototype.clone();
    let element_prototype = realm.element_prototype.clone();

    let doc = ObjectInitializer::new(Some(element_prototype.clone()))
        .property("nodeType", number(9.0))
        .property("nodeName", string("#document"))
        .property("readyState", string("complete"))
        .property("domain", string(config.domain.clone()))
        .property("contentType", string("text/html"))
        .property("children", make_array(vec![]))
        .property("activeElement", null())
        .property("fullscreenEnabled", boolean(true))
        .property("fullscreen", boolean(false))
        .property("hidden", boolean(false))
        .property("visibilityState", string("visible"))
        .property("cookie", string(""))
        .property("title", string(""))
        .property("referrer", string(""))
        .property("characterSet", string("UTF-8"))
        .function("createElement", 1, create_element, Some(function_prototype.clone()))
        .function("getElementById", 1, get_element_by_id, Some(function_prototype.clone()))
        .function("getElementsByTagName", 1, get_elements_by_tag_name, Some(function_prototype.clone()))
        .function("getElementsByName", 1, get_elements_by_name, Some(function_prototype.clone()))
        .function("querySelector", 1, doc_query_selector, Some(function_prototype.clone()))
        .function("querySelectorAll", 1, doc_query_selector_all, Some(function_prototype.clone()))
        .function("toHTML", 0, doc_to_html, Some(function_prototype.clone()))
        .build_value();

    let document_element = ObjectInitializer::new(Some(element_prototype.clone()))
        .property("tagName", string("HTML"))
        .property("nodeName", string("HTML"))
        .property("nodeType", number(1.0))
        .property("id", string(""))
        .property("className", string(""))
        .property("attributes", value_object(Object::new()))
        .property("innerHTML", string(""))
        .property("style", value_object(Object::new()))
        .property("ownerDocument", doc.clone())
        .property("parentNode", doc.clone())
        .build_value();

    let head = ObjectInitializer::new(Some(element_prototype.clone()))
        .property("tagName", string("HEAD"))
        .property("nodeName", string("HEAD"))
        .property("nodeType", number(1.0))
        .property("id", string(""))
        .property("className", string(""))
        .property("attributes", value_object(Object::new()))
        .property("innerHTML", string(""))
        .property("style", value_object(Object::new()))
        .property("children", make_array(vec![]))
        .property("ownerDocument", doc.clone())
        .property("parentNode", document_element.clone())
        .build_value();

    let body = ObjectInitializer::new(Some(element_prototype))
        .property("tagName", string("BODY"))
        .property("nodeName", string("BODY"))
        .property("nodeType", number(1.0))
        .property("id", string(""))
        .property("className", string(""))
        .property("attributes", value_object(Object::new()))
        // The original Python stashes the raw seed HTML source into
        // `body.innerHTML` wholesale (no real parse ever happens); kept
        // here for scripts that read `document.body.innerHTML` back out
        // expecting to see the page source they were seeded with.
        .property("innerHTML", string(config.html.clone()))
        .property("style", value_object(Object::new()))
        .property("children", make_array(vec![]))
        .property("ownerDocument", doc.clone())
        .property("parentNode", document_element.clone())
        .build_value();

    if let Some(html_children) = document_element.as_object().and_then(|o| o.borrow().get_own("children")) {
        let _ = html_children;
    }
    let html_children = make_array(vec![head.clone(), body.clone()]);
    if let Some(o) = document_element.as_object() {
        o.borrow_mut().set_own("children", html_children);
    }
    if let Some(o) = doc.as_object() {
        o.borrow_mut().set_own("documentElement", document_element.clone());
        o.borrow_mut().set_own("head", head);
        o.borrow_mut().set_own("body", body);
        o.borrow_mut().set_own("children", make_array(vec![document_element]));
    }

    doc
}
