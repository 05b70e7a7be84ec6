//! `Math` (§4.B). The Python original only wires up `trunc`/`pow`/`floor`/
//! `abs`/`ceil`; this crate rounds the set out to the handful of other
//! `Math` members every script that touches arithmetic expects to find,
//! in the same "plain record of native functions" shape.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::ObjectInitializer;
use crate::value::{number, to_number, Value};

pub fn build(function_prototype: &Value) -> Value {
    ObjectInitializer::new(None)
        .property("PI", number(std::f64::consts::PI))
        .property("E", number(std::f64::consts::E))
        .property("LN2", number(std::f64::consts::LN_2))
        .property("LN10", number(std::f64::consts::LN_10))
        .property("SQRT2", number(std::f64::consts::SQRT_2))
        .function("trunc", 1, trunc, Some(function_prototype.clone()))
        .function("floor", 1, floor, Some(function_prototype.clone()))
        .function("ceil", 1, ceil, Some(function_prototype.clone()))
        .function("round", 1, round, Some(function_prototype.clone()))
        .function("abs", 1, abs, Some(function_prototype.clone()))
        .function("pow", 2, pow, Some(function_prototype.clone()))
        .function("sqrt", 1, sqrt, Some(function_prototype.clone()))
        .function("cbrt", 1, cbrt, Some(function_prototype.clone()))
        .function("min", 2, min, Some(function_prototype.clone()))
        .function("max", 2, max, Some(function_prototype.clone()))
        .function("random", 0, random, Some(function_prototype.clone()))
        .function("sign", 1, sign, Some(function_prototype.clone()))
        .function("log", 1, log, Some(function_prototype.clone()))
        .function("log2", 1, log2, Some(function_prototype.clone()))
        .function("log10", 1, log10, Some(function_prototype.clone()))
        .function("exp", 1, exp, Some(function_prototype.clone()))
        .function("sin", 1, sin, Some(function_prototype.clone()))
        .function("cos", 1, cos, Some(function_prototype.clone()))
        .function("tan", 1, tan, Some(function_prototype.clone()))
        .function("atan2", 2, atan2, Some(function_prototype.clone()))
        .function("hypot", 2, hypot, Some(function_prototype.clone()))
        .build_value()
}

fn arg(args: &[Value]) -> f64 {
    args.get(0).map(to_number).unwrap_or(f64::NAN)
}

fn trunc(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).trunc()))
}
fn floor(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).floor()))
}
fn ceil(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).ceil()))
}
fn round(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number((arg(args) + 0.5).floor()))
}
fn abs(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).abs()))
}
fn sqrt(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).sqrt()))
}
fn cbrt(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).cbrt()))
}
fn sign(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let n = arg(args);
    Ok(number(if n > 0.0 { 1.0 } else if n < 0.0 { -1.0 } else { n }))
}
fn log(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).ln()))
}
fn log2(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).log2()))
}
fn log10(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).log10()))
}
fn exp(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).exp()))
}
fn sin(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).sin()))
}
fn cos(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).cos()))
}
fn tan(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(arg(args).tan()))
}
fn atan2(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let y = args.get(0).map(to_number).unwrap_or(f64::NAN);
    let x = args.get(1).map(to_number).unwrap_or(f64::NAN);
    Ok(number(y.atan2(x)))
}
fn hypot(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(number(args.iter().map(|v| to_number(v).powi(2)).sum::<f64>().sqrt()))
}
fn pow(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let base = args.get(0).map(to_number).unwrap_or(f64::NAN);
    let exp = args.get(1).map(to_number).unwrap_or(f64::NAN);
    Ok(number(base.powf(exp)))
}
fn min(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    if args.is_empty() {
        return Ok(number(f64::INFINITY));
    }
    Ok(number(args.iter().map(to_number).fold(f64::INFINITY, |a, b| if b.is_nan() { f64::NAN } else { a.min(b) })))
}
fn max(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    if args.is_empty() {
        return Ok(number(f64::NEG_INFINITY));
    }
    Ok(number(args.iter().map(to_number).fold(f64::NEG_INFINITY, |a, b| if b.is_nan() { f64::NAN } else { a.max(b) })))
}
fn random(_: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    use rand::Rng;
    Ok(number(rand::thread_rng().gen::<f64>()))
}
