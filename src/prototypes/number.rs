//! `Number.prototype`. The Python original's `number_prototype` only wires
//! up a bare `toString`, but defines an unused `_to_string36` helper
//! alongside it — this crate finishes the job and wires `toString(radix)`
//! up to it, since SPEC_FULL.md calls for radix support explicitly.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{native_function, Object};
use crate::value::{boolean, format_number, object as value_object, string, to_number, Value, ValueExt};

pub fn install_number_prototype(prototype: &Value) {
    let Some(obj) = prototype.as_object() else { return };
    let mut obj = obj.borrow_mut();
    obj.set_own("toString", native_function("toString", 1, to_string_fn, None));
    obj.set_own("valueOf", native_function("valueOf", 0, value_of, None));
    obj.set_own("toFixed", native_function("toFixed", 1, to_fixed, None));
    obj.set_own("toPrecision", native_function("toPrecision", 1, to_precision, None));
}

fn to_string_fn(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let n = to_number(this);
    let radix = args.get(0).map(to_number).unwrap_or(10.0) as u32;
    if radix == 10 {
        return Ok(string(format_number(n)));
    }
    if !(2..=36).contains(&radix) {
        return interp.throw_range_error("toString() radix must be between 2 and 36");
    }
    Ok(string(to_radix_string(n, radix)))
}

fn value_of(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(crate::value::number(to_number(this)))
}

fn to_fixed(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let n = to_number(this);
    let digits = args.get(0).map(to_number).unwrap_or(0.0).max(0.0) as usize;
    if !n.is_finite() {
        return Ok(string(format_number(n)));
    }
    Ok(string(format!("{:.*}", digits, n)))
}

fn to_precision(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let n = to_number(this);
    let Some(p) = args.get(0).map(to_number) else { return Ok(string(format_number(n))) };
    if !n.is_finite() {
        return Ok(string(format_number(n)));
    }
    Ok(string(format!("{:.*e}", (p as usize).saturating_sub(1), n).replace('e', "e+").replace("e+-", "e-")))
}

/// Mirrors `_to_string36`: repeated divmod, least-significant digit first.
fn to_radix_string(n: f64, radix: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let negative = n < 0.0;
    let mut int_part = n.abs().trunc() as u64;
    let mut frac_part = n.abs().fract();

    let mut int_digits = Vec::new();
    if int_part == 0 {
        int_digits.push(b'0');
    }
    while int_part > 0 {
        int_digits.push(DIGITS[(int_part % radix as u64) as usize]);
        int_part /= radix as u64;
    }
    int_digits.reverse();
    let mut out = String::from_utf8(int_digits).unwrap();

    if frac_part > 0.0 {
        out.push('.');
        for _ in 0..20 {
            frac_part *= radix as f64;
            let digit = frac_part.trunc() as usize;
            out.push(DIGITS[digit] as char);
            frac_part -= digit as f64;
            if frac_part <= 0.0 {
                break;
            }
        }
    }

    if negative {
        format!("-{}", out)
    } else {
        out
    }
}

fn is_integer(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let ok = args.get(0).map(|v| v.is_number() && { let n = to_number(v); n.is_finite() && n.fract() == 0.0 }).unwrap_or(false);
    Ok(boolean(ok))
}

fn is_finite(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(boolean(args.get(0).map(|v| v.is_number() && to_number(v).is_finite()).unwrap_or(false)))
}

fn is_nan(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(boolean(args.get(0).map(|v| v.is_number() && to_number(v).is_nan()).unwrap_or(false)))
}

/// `Number(x)` coerces like `ToNumber`; `new Number(x)` builds a boxed
/// instance — this crate's scripts only ever probe the static constants
/// and bare-call coercion, so both forms return the same primitive.
fn number_ctor(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(crate::value::number(args.get(0).map(to_number).unwrap_or(0.0)))
}

pub fn create_number_constructor(function_prototype: &Value, number_prototype: &Value) -> Value {
    let ctor = value_object(Object::native_function("Number", 1, number_ctor, Some(function_prototype.clone())));
    if let Some(obj) = ctor.as_object() {
        let mut obj = obj.borrow_mut();
        obj.set_own("prototype", number_prototype.clone());
        obj.set_own("name", string("Number"));
        obj.set_own("EPSILON", crate::value::number(f64::EPSILON));
        obj.set_own("MAX_SAFE_INTEGER", crate::value::number(9007199254740991.0));
        obj.set_own("MIN_SAFE_INTEGER", crate::value::number(-9007199254740991.0));
        obj.set_own("MAX_VALUE", crate::value::number(f64::MAX));
        obj.set_own("MIN_VALUE", crate::value::number(f64::MIN_POSITIVE));
        obj.set_own("POSITIVE_INFINITY", crate::value::number(f64::INFINITY));
        obj.set_own("NEGATIVE_INFINITY", crate::value::number(f64::NEG_INFINITY));
        obj.set_own("NaN", crate::value::number(f64::NAN));
        obj.set_own("isInteger", native_function("isInteger", 1, is_integer, None));
        obj.set_own("isFinite", native_function("isFinite", 1, is_finite, None));
        obj.set_own("isNaN", native_function("isNaN", 1, is_nan, None));
    }
    if let Some(proto_obj) = number_prototype.as_object() {
        proto_obj.borrow_mut().set_own("constructor", ctor.clone());
    }
    ctor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::{HostConfig, Realm};
    use crate::value::{number, to_js_string};

    fn interp() -> Interpreter {
        Interpreter::new(Realm::new(&HostConfig::default()))
    }

    #[test]
    fn to_string_base36_uses_lowercase_alphabet() {
        let mut i = interp();
        let result = to_string_fn(&number(35.0), &[number(36.0)], &mut i).unwrap();
        assert_eq!(to_js_string(&result), "z");
    }

    #[test]
    fn to_string_default_radix_matches_decimal() {
        let mut i = interp();
        let result = to_string_fn(&number(255.0), &[], &mut i).unwrap();
        assert_eq!(to_js_string(&result), "255");
    }

    #[test]
    fn to_string_hex_radix() {
        let mut i = interp();
        let result = to_string_fn(&number(255.0), &[number(16.0)], &mut i).unwrap();
        assert_eq!(to_js_string(&result), "ff");
    }

    #[test]
    fn to_string_rejects_out_of_range_radix() {
        let mut i = interp();
        assert!(to_string_fn(&number(1.0), &[number(37.0)], &mut i).is_err());
    }
}
