//! Global encoding/parsing helpers (§4.B): `atob`/`btoa`,
//! `encodeURI(Component)`/`decodeURI(Component)`, `escape`/`unescape`,
//! `parseInt`/`parseFloat`. Grounded on `window.py`'s
//! `_atob_func`/`_btoa_func`/`escape`/`unescape`/`parse_int`/`parse_float`,
//! reimplemented over the `base64`/`percent-encoding` crates already in
//! the teacher's dependency stack rather than hand-rolled byte shuffling.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::value::{number, string, to_js_string, Value};
use base64::{decode, encode};

pub fn atob(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let input = args.get(0).map(to_js_string).unwrap_or_default();
    match decode(input.trim()) {
        Ok(bytes) => Ok(string(bytes.iter().map(|b| *b as char).collect::<String>())),
        Err(_) => interp.throw_range_error("Invalid character: the string to be decoded is not correctly encoded"),
    }
}

pub fn btoa(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let input = args.get(0).map(to_js_string).unwrap_or_default();
    if input.chars().any(|c| c as u32 > 0xFF) {
        return interp.throw_range_error("The string to be encoded contains characters outside of the Latin1 range");
    }
    let bytes: Vec<u8> = input.chars().map(|c| c as u8).collect();
    Ok(string(encode(&bytes)))
}

/// RFC-3986 "safe" set for `encodeURI`: letters, digits, and
/// `;/?:@&=+$,-_.!~*'()#`.
fn uri_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || ";/?:@&=+$,-_.!~*'()#".contains(c)
}

/// Narrower safe set for `encodeURIComponent`: letters, digits, and
/// `-_.!~*'()`.
fn uri_component_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_.!~*'()".contains(c)
}

fn percent_encode(s: &str, safe: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    for c in s.chars() {
        if safe(c) {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).as_bytes() {
                out.push_str(&format!("%{:02X}", b));
            }
        }
    }
    out
}

fn percent_decode(s: &str) -> String {
    percent_encoding::percent_decode_str(s).decode_utf8_lossy().into_owned()
}

pub fn encode_uri(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(percent_encode(&args.get(0).map(to_js_string).unwrap_or_default(), uri_safe)))
}

pub fn encode_uri_component(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(percent_encode(&args.get(0).map(to_js_string).unwrap_or_default(), uri_component_safe)))
}

pub fn decode_uri(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(percent_decode(&args.get(0).map(to_js_string).unwrap_or_default())))
}

pub fn decode_uri_component(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    Ok(string(percent_decode(&args.get(0).map(to_js_string).unwrap_or_default())))
}

/// `escape`: percent-hex for everything outside `A-Za-z0-9 @*_+-./`, with
/// a `%uXXXX` fallback for code points ≥ 256.
pub fn escape(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let input = args.get(0).map(to_js_string).unwrap_or_default();
    let mut out = String::new();
    for c in input.chars() {
        let code = c as u32;
        if c.is_ascii_alphanumeric() || "@*_+-./".contains(c) {
            out.push(c);
        } else if code < 256 {
            out.push_str(&format!("%{:02X}", code));
        } else {
            out.push_str(&format!("%u{:04X}", code));
        }
    }
    Ok(string(out))
}

pub fn unescape(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let input = args.get(0).map(to_js_string).unwrap_or_default();
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '%' && i + 1 < chars.len() && chars[i + 1] == 'u' && i + 5 < chars.len() {
            let hex: String = chars[i + 2..i + 6].iter().collect();
            if let Ok(code) = u32::from_str_radix(&hex, 16) {
                if let Some(ch) = char::from_u32(code) {
                    out.push(ch);
                    i += 6;
                    continue;
                }
            }
        }
        if chars[i] == '%' && i + 2 < chars.len() {
            let hex: String = chars[i + 1..i + 3].iter().collect();
            if let Ok(code) = u32::from_str_radix(&hex, 16) {
                if let Some(ch) = char::from_u32(code) {
                    out.push(ch);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    Ok(string(out))
}

/// Strips leading whitespace, sniffs a `0x`/`0X` prefix when `radix` is 0
/// or absent, then takes the longest leading run of digits valid in the
/// chosen base — mirrors `window.py`'s `parse_int` regex-prefix approach.
pub fn parse_int(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = args.get(0).map(to_js_string).unwrap_or_default();
    let s = s.trim_start();
    let mut radix = args.get(1).map(crate::value::to_number).filter(|n| *n != 0.0).map(|n| n as u32).unwrap_or(0);
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let s = if radix == 0 || radix == 16 {
        if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            radix = 16;
            rest
        } else {
            if radix == 0 {
                radix = 10;
            }
            s
        }
    } else {
        s
    };
    if !(2..=36).contains(&radix) {
        return Ok(number(f64::NAN));
    }
    let digit_count = s.chars().take_while(|c| c.to_digit(radix).is_some()).count();
    if digit_count == 0 {
        return Ok(number(f64::NAN));
    }
    let digits = &s[..digit_count];
    match i64::from_str_radix(digits, radix) {
        Ok(n) => Ok(number(if negative { -(n as f64) } else { n as f64 })),
        Err(_) => {
            // Overflows i64 for absurdly long digit runs; fall back to
            // accumulating in f64 the same way a real engine's bignum-free
            // parseInt does.
            let mut acc = 0.0f64;
            for c in digits.chars() {
                acc = acc * radix as f64 + c.to_digit(radix).unwrap() as f64;
            }
            Ok(number(if negative { -acc } else { acc }))
        }
    }
}

/// Longest leading `[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?` prefix.
pub fn parse_float(_: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let s = args.get(0).map(to_js_string).unwrap_or_default();
    let s = s.trim_start();
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
        i += 1;
    }
    let digits_start = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    let mut saw_digits = i > digits_start;
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        let frac_start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        saw_digits = saw_digits || i > frac_start;
    }
    if !saw_digits {
        return Ok(number(f64::NAN));
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        let exp_start = j;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    let prefix: String = chars[..i].iter().collect();
    Ok(number(prefix.parse().unwrap_or(f64::NAN)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::{HostConfig, Realm};
    use crate::value::to_number;

    fn interp() -> Interpreter {
        Interpreter::new(Realm::new(&HostConfig::default()))
    }

    #[test]
    fn btoa_then_atob_roundtrips() {
        let mut i = interp();
        let encoded = btoa(&crate::value::undefined(), &[string("hello".to_string())], &mut i).unwrap();
        let decoded = atob(&crate::value::undefined(), &[encoded], &mut i).unwrap();
        assert_eq!(to_js_string(&decoded), "hello");
    }

    #[test]
    fn btoa_rejects_non_latin1_input() {
        let mut i = interp();
        assert!(btoa(&crate::value::undefined(), &[string("héllo🎉".to_string())], &mut i).is_err());
    }

    #[test]
    fn encode_uri_component_escapes_reserved_characters() {
        let mut i = interp();
        let result = encode_uri_component(&crate::value::undefined(), &[string("a b/c?d".to_string())], &mut i).unwrap();
        assert_eq!(to_js_string(&result), "a%20b%2Fc%3Fd");
    }

    #[test]
    fn decode_uri_component_reverses_encode_uri_component() {
        let mut i = interp();
        let encoded = encode_uri_component(&crate::value::undefined(), &[string("a b/c?d".to_string())], &mut i).unwrap();
        let decoded = decode_uri_component(&crate::value::undefined(), &[encoded], &mut i).unwrap();
        assert_eq!(to_js_string(&decoded), "a b/c?d");
    }

    #[test]
    fn parse_int_sniffs_hex_prefix() {
        let mut i = interp();
        let result = parse_int(&crate::value::undefined(), &[string("0xFF".to_string())], &mut i).unwrap();
        assert_eq!(to_number(&result), 255.0);
    }

    #[test]
    fn parse_int_stops_at_first_non_digit() {
        let mut i = interp();
        let result = parse_int(&crate::value::undefined(), &[string("42px".to_string())], &mut i).unwrap();
        assert_eq!(to_number(&result), 42.0);
    }

    #[test]
    fn parse_int_returns_nan_for_no_leading_digits() {
        let mut i = interp();
        let result = parse_int(&crate::value::undefined(), &[string("px42".to_string())], &mut i).unwrap();
        assert!(to_number(&result).is_nan());
    }

    #[test]
    fn parse_float_reads_exponent_notation() {
        let mut i = interp();
        let result = parse_float(&crate::value::undefined(), &[string("3.14e2abc".to_string())], &mut i).unwrap();
        assert_eq!(to_number(&result), 314.0);
    }

    #[test]
    fn escape_uses_u_prefix_for_non_latin1_code_points() {
        let mut i = interp();
        let result = escape(&crate::value::undefined(), &[string("é".to_string())], &mut i).unwrap();
        assert_eq!(to_js_string(&result), "%u00E9");
    }

    #[test]
    fn unescape_reverses_escape_output() {
        let mut i = interp();
        let escaped = escape(&crate::value::undefined(), &[string("a b".to_string())], &mut i).unwrap();
        let result = unescape(&crate::value::undefined(), &[escaped], &mut i).unwrap();
        assert_eq!(to_js_string(&result), "a b");
    }
}
