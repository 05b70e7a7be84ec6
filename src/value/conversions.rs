//! Type coercions (`ToPrimitive`/`ToString`/`ToNumber`/`ToBoolean`/`typeof`).

use super::ValueData;
use crate::error::{JsErrorKind, JsResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

/// `typeof` per spec §9: always a lowercase ECMAScript string, never a
/// host type object (the bug the Python original had).
pub fn type_of(value: &Value) -> &'static str {
    match &**value {
        ValueData::Null => "object",
        ValueData::Undefined => "undefined",
        ValueData::Boolean(_) => "boolean",
        ValueData::Number(_) => "number",
        ValueData::String(_) => "string",
        ValueData::Object(o) => {
            if o.borrow().is_callable() {
                "function"
            } else {
                "object"
            }
        }
    }
}

pub fn value_data_to_display(data: &ValueData) -> String {
    match data {
        ValueData::Null => "null".to_string(),
        ValueData::Undefined => "undefined".to_string(),
        ValueData::Boolean(b) => b.to_string(),
        ValueData::Number(n) => format_number(*n),
        ValueData::String(s) => s.clone(),
        ValueData::Object(_) => "[object Object]".to_string(),
    }
}

/// `ToString` for numbers follows JS formatting rules closely enough for
/// fingerprinting scripts: integral doubles print without a trailing
/// `.0`, `NaN`/`Infinity` print as their JS spellings.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// `ToBoolean`, a pure conversion with no observable side effects.
pub fn to_boolean(value: &Value) -> bool {
    match &**value {
        ValueData::Null | ValueData::Undefined => false,
        ValueData::Boolean(b) => *b,
        ValueData::Number(n) => *n != 0.0 && !n.is_nan(),
        ValueData::String(s) => !s.is_empty(),
        ValueData::Object(_) => true,
    }
}

/// `ToPrimitive` with `hint`. Calls `valueOf`/`toString` on the object in
/// the order the hint dictates, falling back to `"[object Object]"` if
/// neither returns a primitive (mirrors `ordinary_to_primitive`).
pub fn to_primitive(interp: &mut Interpreter, value: &Value, hint: &str) -> JsResult<Value> {
    let obj = match value.as_object() {
        Some(o) => o,
        None => return Ok(value.clone()),
    };
    let order: [&str; 2] = if hint == "string" {
        ["toString", "valueOf"]
    } else {
        ["valueOf", "toString"]
    };
    for method_name in order {
        let method = obj.borrow().get_own(method_name);
        if let Some(method) = method {
            if method.as_object().map(|o| o.borrow().is_callable()).unwrap_or(false) {
                let result = interp.call_value(&method, value, &[])?;
                if result.as_object().is_none() {
                    return Ok(result);
                }
            }
        }
    }
    Ok(crate::value::string("[object Object]"))
}

pub fn to_js_string(value: &Value) -> String {
    value_data_to_display(value)
}

/// `ToNumber`, non-observable for primitives, may invoke `ToPrimitive` for
/// objects (callers that can trigger user code should use
/// `to_number_interp` instead).
pub fn to_number(value: &Value) -> f64 {
    match &**value {
        ValueData::Null => 0.0,
        ValueData::Undefined => f64::NAN,
        ValueData::Boolean(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        ValueData::Number(n) => *n,
        ValueData::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        ValueData::Object(_) => f64::NAN,
    }
}

pub fn to_number_interp(interp: &mut Interpreter, value: &Value) -> JsResult<f64> {
    if value.is_object() {
        let prim = to_primitive(interp, value, "number")?;
        Ok(to_number(&prim))
    } else {
        Ok(to_number(value))
    }
}

/// `ToInt32` (ECMA-262 7.1.6), used by the bitwise operators.
pub fn to_int32(n: f64) -> i32 {
    if !n.is_finite() || n == 0.0 {
        return 0;
    }
    let n = n.trunc();
    let m = n.rem_euclid(4294967296.0);
    if m >= 2147483648.0 {
        (m - 4294967296.0) as i32
    } else {
        m as i32
    }
}

/// `ToUint32` (ECMA-262 7.1.7), used by `>>>`.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() || n == 0.0 {
        return 0;
    }
    let n = n.trunc();
    n.rem_euclid(4294967296.0) as u32
}

pub fn throw_reference_error(name: &str) -> JsResult<Value> {
    Err(crate::error::JsError::new(
        JsErrorKind::Reference,
        crate::value::string(format!("{} is not defined", name)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{boolean, null, number, string, undefined};

    #[test]
    fn type_of_reports_lowercase_ecmascript_names() {
        assert_eq!(type_of(&undefined()), "undefined");
        assert_eq!(type_of(&null()), "object");
        assert_eq!(type_of(&boolean(true)), "boolean");
        assert_eq!(type_of(&number(1.0)), "number");
        assert_eq!(type_of(&string("s")), "string");
    }

    #[test]
    fn format_number_matches_js_tostring_rules() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(1.5), "1.5");
    }

    #[test]
    fn to_boolean_falsy_values() {
        assert_eq!(to_boolean(&null()), false);
        assert_eq!(to_boolean(&undefined()), false);
        assert_eq!(to_boolean(&number(0.0)), false);
        assert_eq!(to_boolean(&number(f64::NAN)), false);
        assert_eq!(to_boolean(&string("")), false);
        assert_eq!(to_boolean(&string("0")), true);
    }

    #[test]
    fn to_number_parses_trimmed_numeric_strings() {
        assert_eq!(to_number(&string("  42  ")), 42.0);
        assert_eq!(to_number(&string("")), 0.0);
        assert!(to_number(&string("abc")).is_nan());
        assert_eq!(to_number(&boolean(true)), 1.0);
        assert_eq!(to_number(&null()), 0.0);
        assert!(to_number(&undefined()).is_nan());
    }

    #[test]
    fn to_int32_wraps_values_beyond_32_bits() {
        assert_eq!(to_int32(4294967296.0), 0);
        assert_eq!(to_int32(4294967295.0), -1);
        assert_eq!(to_int32(2147483648.0), -2147483648);
        assert_eq!(to_int32(f64::NAN), 0);
        assert_eq!(to_int32(f64::INFINITY), 0);
    }

    #[test]
    fn to_uint32_wraps_negative_values_into_unsigned_range() {
        assert_eq!(to_uint32(-1.0), 4294967295);
        assert_eq!(to_uint32(4294967296.0), 0);
        assert_eq!(to_uint32(0.0), 0);
    }
}
