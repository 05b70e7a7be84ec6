//! `TextEncoder`/`TextDecoder` (§4.B), grounded on `window.py`'s
//! `TextEncoder`/`TextDecoder` classes. `encode` hands back a `Uint8Array`
//! via the same `from_bytes` helper `crypto.rs` uses; `decode` accepts
//! either a typed array or a bare string (the original is equally loose
//! about its input).

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{native_function, ByteArrayKind, Object, ObjectInitializer};
use crate::value::{number, object as value_object, string, to_js_string, Value, ValueExt};

fn encode(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let text = args.get(0).map(to_js_string).unwrap_or_default();
    Ok(crate::prototypes::from_bytes(ByteArrayKind::U8, text.into_bytes(), &interp.realm.byte_array_prototype))
}

fn encode_into(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let text = args.get(0).map(to_js_string).unwrap_or_default();
    let bytes = text.into_bytes();
    if let Some(target) = args.get(1) {
        crate::prototypes::set_raw_bytes(target, &bytes);
    }
    let result = value_object(Object::new());
    if let Some(o) = result.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("read", number(bytes.len() as f64));
        o.set_own("written", number(bytes.len() as f64));
    }
    Ok(result)
}

fn decode(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let bytes = args.get(0).map(|v| crate::prototypes::raw_bytes(v).unwrap_or_else(|| to_js_string(v).into_bytes())).unwrap_or_default();
    Ok(string(String::from_utf8_lossy(&bytes).into_owned()))
}

fn text_encoder_ctor(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    if let Some(o) = this.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("encoding", string("utf-8"));
    }
    Ok(this.clone())
}

fn text_decoder_ctor(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let label = args.get(0).map(to_js_string).unwrap_or_else(|| "utf-8".to_string());
    if let Some(o) = this.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("encoding", string(label));
        o.set_own("fatal", crate::value::boolean(false));
        o.set_own("ignoreBOM", crate::value::boolean(false));
    }
    Ok(this.clone())
}

pub fn build(function_prototype: &Value) -> (Value, Value) {
    let encoder_proto = ObjectInitializer::new(Some(function_prototype.clone()))
        .function("encode", 1, encode, Some(function_prototype.clone()))
        .function("encodeInto", 2, encode_into, Some(function_prototype.clone()))
        .build_value();
    let text_encoder = native_function("TextEncoder", 0, text_encoder_ctor, Some(function_prototype.clone()));
    if let Some(o) = text_encoder.as_object() {
        o.borrow_mut().set_own("prototype", encoder_proto);
    }

    let decoder_proto = ObjectInitializer::new(Some(function_prototype.clone())).function("decode", 1, decode, Some(function_prototype.clone())).build_value();
    let text_decoder = native_function("TextDecoder", 0, text_decoder_ctor, Some(function_prototype.clone()));
    if let Some(o) = text_decoder.as_object() {
        o.borrow_mut().set_own("prototype", decoder_proto);
    }

    (text_encoder, text_decoder)
}
