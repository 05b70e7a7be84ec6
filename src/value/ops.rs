//! Binary operators and the two JS equality algorithms.

use super::{number, to_boolean, to_int32, to_js_string, to_number, to_number_interp, to_uint32, ValueData};
use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::value::{boolean, string, Value, ValueExt};

/// `===`. No coercion, no user code invoked.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (&**a, &**b) {
        (ValueData::Null, ValueData::Null) => true,
        (ValueData::Undefined, ValueData::Undefined) => true,
        (ValueData::Boolean(x), ValueData::Boolean(y)) => x == y,
        (ValueData::Number(x), ValueData::Number(y)) => x == y,
        (ValueData::String(x), ValueData::String(y)) => x == y,
        (ValueData::Object(x), ValueData::Object(y)) => std::ptr::eq(x, y),
        _ => false,
    }
}

/// `==`. May coerce; objects only compare equal to other objects by
/// identity (coercing an object to a primitive for `==` against a
/// primitive is deliberately out of scope — not needed by the seed
/// scenarios and avoids a user-code call from inside a "pure" comparator).
pub fn loose_equals(a: &Value, b: &Value) -> bool {
    use ValueData::*;
    match (&**a, &**b) {
        (Null, Undefined) | (Undefined, Null) => true,
        (Number(x), String(_)) => *x == to_number(b),
        (String(_), Number(y)) => to_number(a) == *y,
        (Boolean(_), _) => loose_equals(&number(to_number(a)), b),
        (_, Boolean(_)) => loose_equals(a, &number(to_number(b))),
        _ => strict_equals(a, b),
    }
}

/// Arithmetic/bitwise/relational binary operators that may call user
/// code through `ToPrimitive`/`ToNumber`, hence take the interpreter.
pub fn add(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
    let pa = crate::value::to_primitive(interp, a, "default")?;
    let pb = crate::value::to_primitive(interp, b, "default")?;
    if pa.is_string() || pb.is_string() {
        Ok(string(format!("{}{}", to_js_string(&pa), to_js_string(&pb))))
    } else {
        Ok(number(to_number(&pa) + to_number(&pb)))
    }
}

macro_rules! numeric_op {
    ($name:ident, $op:tt) => {
        pub fn $name(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
            let x = to_number_interp(interp, a)?;
            let y = to_number_interp(interp, b)?;
            Ok(number(x $op y))
        }
    };
}

numeric_op!(sub, -);
numeric_op!(mul, *);
numeric_op!(div, /);

pub fn rem(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
    let x = to_number_interp(interp, a)?;
    let y = to_number_interp(interp, b)?;
    Ok(number(x % y))
}

pub fn pow(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
    let x = to_number_interp(interp, a)?;
    let y = to_number_interp(interp, b)?;
    Ok(number(x.powf(y)))
}

pub fn less_than(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
    let pa = crate::value::to_primitive(interp, a, "number")?;
    let pb = crate::value::to_primitive(interp, b, "number")?;
    if pa.is_string() && pb.is_string() {
        Ok(boolean(to_js_string(&pa) < to_js_string(&pb)))
    } else {
        Ok(boolean(to_number(&pa) < to_number(&pb)))
    }
}

pub fn greater_than(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
    less_than(interp, b, a)
}

pub fn less_or_equal(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
    let gt = greater_than(interp, a, b)?;
    Ok(boolean(!to_boolean(&gt)))
}

pub fn greater_or_equal(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
    let lt = less_than(interp, a, b)?;
    Ok(boolean(!to_boolean(&lt)))
}

macro_rules! bitwise_op {
    ($name:ident, $op:tt) => {
        pub fn $name(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
            let x = to_int32(to_number_interp(interp, a)?);
            let y = to_int32(to_number_interp(interp, b)?);
            Ok(number((x $op y) as f64))
        }
    };
}

bitwise_op!(bit_and, &);
bitwise_op!(bit_or, |);
bitwise_op!(bit_xor, ^);

pub fn shift_left(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
    let x = to_int32(to_number_interp(interp, a)?);
    let shift = to_uint32(to_number_interp(interp, b)?) & 0x1f;
    Ok(number((x.wrapping_shl(shift)) as f64))
}

pub fn shift_right(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
    let x = to_int32(to_number_interp(interp, a)?);
    let shift = to_uint32(to_number_interp(interp, b)?) & 0x1f;
    Ok(number((x.wrapping_shr(shift)) as f64))
}

pub fn unsigned_shift_right(interp: &mut Interpreter, a: &Value, b: &Value) -> JsResult<Value> {
    let x = to_uint32(to_number_interp(interp, a)?);
    let shift = to_uint32(to_number_interp(interp, b)?) & 0x1f;
    Ok(number((x.wrapping_shr(shift)) as f64))
}
