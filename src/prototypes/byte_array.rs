//! Typed byte-array prototype (§4.A) — the nine element kinds spec.md
//! lists, implemented uniformly over one `Vec<u8>` backing store per
//! Open Question #2's resolution, rather than nine separate Rust types.
//! Grounded on `examples/original_source/js_properties.py`'s
//! `array_prototype` for the shared method shapes (`toString`/iteration)
//! and on the typed-array constructors every fingerprinting script
//! expects to find at global scope.

use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::object::{native_function, ByteArrayKind, Object, ObjectKind};
use crate::value::{number, object as value_object, string, to_js_string, to_number, undefined, Value, ValueExt};

/// Reads element `idx` out of `bytes` as `kind`, or `None` if out of range.
pub(crate) fn read_index(kind: ByteArrayKind, bytes: &[u8], idx: usize) -> Option<Value> {
    let size = kind.element_size();
    let start = idx.checked_mul(size)?;
    let end = start.checked_add(size)?;
    let slice = bytes.get(start..end)?;
    let n = match kind {
        ByteArrayKind::I8 => slice[0] as i8 as f64,
        ByteArrayKind::U8 | ByteArrayKind::U8Clamped => slice[0] as f64,
        ByteArrayKind::I16 => i16::from_le_bytes([slice[0], slice[1]]) as f64,
        ByteArrayKind::U16 => u16::from_le_bytes([slice[0], slice[1]]) as f64,
        ByteArrayKind::I32 => i32::from_le_bytes(slice.try_into().unwrap()) as f64,
        ByteArrayKind::U32 => u32::from_le_bytes(slice.try_into().unwrap()) as f64,
        ByteArrayKind::F16 => half_to_f64(u16::from_le_bytes([slice[0], slice[1]])),
        ByteArrayKind::F32 => f32::from_le_bytes(slice.try_into().unwrap()) as f64,
        ByteArrayKind::F64 => f64::from_le_bytes(slice.try_into().unwrap()),
    };
    Some(number(n))
}

/// Writes `value` into element `idx`. Unsigned integer kinds wrap modulo
/// 2^W per the invariant in §3/§8; `U8Clamped` saturates instead, matching
/// `Uint8ClampedArray` semantics. Out-of-range indices are ignored (typed
/// arrays are fixed-length; a silent no-op matches §4.A's general "writes
/// through a primitive no-op" posture).
pub(crate) fn write_index(kind: ByteArrayKind, bytes: &mut [u8], idx: usize, value: &Value) {
    let size = kind.element_size();
    let Some(start) = idx.checked_mul(size) else { return };
    let end = start + size;
    if end > bytes.len() {
        return;
    }
    let n = to_number(value);
    match kind {
        ByteArrayKind::I8 => bytes[start] = (wrap_i64(n) as i8) as u8,
        ByteArrayKind::U8 => bytes[start] = wrap_i64(n) as u8,
        ByteArrayKind::U8Clamped => bytes[start] = clamp_u8(n),
        ByteArrayKind::I16 => bytes[start..end].copy_from_slice(&(wrap_i64(n) as i16).to_le_bytes()),
        ByteArrayKind::U16 => bytes[start..end].copy_from_slice(&(wrap_i64(n) as u16).to_le_bytes()),
        ByteArrayKind::I32 => bytes[start..end].copy_from_slice(&(wrap_i64(n) as i32).to_le_bytes()),
        ByteArrayKind::U32 => bytes[start..end].copy_from_slice(&(wrap_i64(n) as u32).to_le_bytes()),
        ByteArrayKind::F16 => bytes[start..end].copy_from_slice(&f64_to_half(n).to_le_bytes()),
        ByteArrayKind::F32 => bytes[start..end].copy_from_slice(&(n as f32).to_le_bytes()),
        ByteArrayKind::F64 => bytes[start..end].copy_from_slice(&n.to_le_bytes()),
    }
}

fn wrap_i64(n: f64) -> i64 {
    if !n.is_finite() {
        0
    } else {
        n.trunc() as i64
    }
}

fn clamp_u8(n: f64) -> u8 {
    if n.is_nan() {
        0
    } else {
        n.round().clamp(0.0, 255.0) as u8
    }
}

/// Minimal IEEE-754 binary16 <-> f64 conversion. No subnormal/NaN-payload
/// fidelity is attempted — fingerprinting scripts read these back as
/// plain numbers, not bit patterns.
fn half_to_f64(bits: u16) -> f64 {
    let sign = ((bits >> 15) & 1) as u64;
    let exp = ((bits >> 10) & 0x1f) as i64;
    let frac = (bits & 0x3ff) as u64;
    let value = if exp == 0 {
        (frac as f64) / 1024.0 * 2f64.powi(-14)
    } else if exp == 0x1f {
        if frac == 0 {
            f64::INFINITY
        } else {
            return f64::NAN;
        }
    } else {
        (1.0 + (frac as f64) / 1024.0) * 2f64.powi((exp - 15) as i32)
    };
    if sign == 1 {
        -value
    } else {
        value
    }
}

fn f64_to_half(n: f64) -> u16 {
    if n.is_nan() {
        return 0x7e00;
    }
    let sign: u16 = if n.is_sign_negative() { 0x8000 } else { 0 };
    let abs = n.abs();
    if abs.is_infinite() || abs > 65504.0 {
        return sign | 0x7c00;
    }
    if abs == 0.0 {
        return sign;
    }
    let exp = abs.log2().floor() as i32;
    let mant = abs / 2f64.powi(exp) - 1.0;
    let biased = exp + 15;
    if biased <= 0 {
        return sign;
    }
    sign | ((biased as u16) << 10) | ((mant * 1024.0).round() as u16 & 0x3ff)
}

pub(crate) fn byte_len(kind: ByteArrayKind, bytes: &[u8]) -> usize {
    bytes.len() / kind.element_size().max(1)
}

/// Builds a typed-array instance either from an integer length
/// (zero-filled) or from a list of numbers.
pub fn construct(kind: ByteArrayKind, arg: &Value, prototype: &Value) -> Value {
    let size = kind.element_size();
    let bytes = if let Some(obj) = arg.as_object() {
        if obj.borrow().is_array() {
            let len = obj.borrow().array_length();
            let mut out = vec![0u8; len as usize * size];
            for i in 0..len {
                if let Some(v) = obj.borrow().get_own(&i.to_string()) {
                    write_index(kind, &mut out, i as usize, &v);
                }
            }
            out
        } else {
            vec![0u8; to_number(arg).max(0.0) as usize * size]
        }
    } else {
        vec![0u8; to_number(arg).max(0.0) as usize * size]
    };
    let length = byte_len(kind, &bytes);
    let value = value_object(Object::with_kind(ObjectKind::ByteArray(kind, bytes), Some(prototype.clone())));
    if let Some(o) = value.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("byteLength", number((length * size) as f64));
        o.set_own("length", number(length as f64));
    }
    value
}

/// Wraps an already-computed byte buffer (a digest, ciphertext, random
/// fill) as a typed-array instance directly, skipping the list/length
/// argument dance `construct` does for script-level `new Ctor(...)`.
pub fn from_bytes(kind: ByteArrayKind, bytes: Vec<u8>, prototype: &Value) -> Value {
    let size = kind.element_size();
    let length = byte_len(kind, &bytes);
    let value = value_object(Object::with_kind(ObjectKind::ByteArray(kind, bytes), Some(prototype.clone())));
    if let Some(o) = value.as_object() {
        let mut o = o.borrow_mut();
        o.set_own("byteLength", number((length * size) as f64));
        o.set_own("length", number(length as f64));
    }
    value
}

pub fn install_byte_array_prototype(prototype: &Value) {
    let Some(obj) = prototype.as_object() else { return };
    let mut obj = obj.borrow_mut();
    obj.set_own("toString", native_function("toString", 0, to_string_fn, None));
    obj.set_own("fill", native_function("fill", 1, fill, None));
    obj.set_own("forEach", native_function("forEach", 1, for_each, None));
}

/// Copies a typed array's raw backing bytes out, for callers (crypto
/// digest/encrypt, `TextEncoder`) that need a plain `Vec<u8>` rather than
/// element-wise access.
pub(crate) fn raw_bytes(value: &Value) -> Option<Vec<u8>> {
    with_bytes(value, |_, bytes| bytes.to_vec())
}

/// Replaces a typed array's backing bytes in place, keeping `length`
/// bookkeeping in sync — used by `crypto.getRandomValues`.
pub(crate) fn set_raw_bytes(value: &Value, new_bytes: &[u8]) {
    if let Some(obj) = value.as_object() {
        let mut obj = obj.borrow_mut();
        if let ObjectKind::ByteArray(kind, bytes) = &mut obj.kind {
            bytes.copy_from_slice(&new_bytes[..bytes.len().min(new_bytes.len())]);
            let _ = *kind;
        }
    }
}

fn with_bytes<R>(this: &Value, f: impl FnOnce(ByteArrayKind, &[u8]) -> R) -> Option<R> {
    let obj = this.as_object()?;
    let obj = obj.borrow();
    match &obj.kind {
        ObjectKind::ByteArray(kind, bytes) => Some(f(*kind, bytes)),
        _ => None,
    }
}

fn to_string_fn(this: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let out = with_bytes(this, |kind, bytes| {
        (0..byte_len(kind, bytes))
            .map(|i| read_index(kind, bytes, i).map(|v| to_js_string(&v)).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",")
    })
    .unwrap_or_default();
    Ok(string(out))
}

fn fill(this: &Value, args: &[Value], _: &mut Interpreter) -> JsResult<Value> {
    let value = args.get(0).cloned().unwrap_or_else(undefined);
    if let Some(obj) = this.as_object() {
        let mut obj = obj.borrow_mut();
        if let ObjectKind::ByteArray(kind, bytes) = &mut obj.kind {
            let len = byte_len(*kind, bytes);
            for i in 0..len {
                write_index(*kind, bytes, i, &value);
            }
        }
    }
    Ok(this.clone())
}

fn for_each(this: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let Some(callback) = args.get(0).cloned() else { return Ok(undefined()) };
    let items: Vec<Value> = with_bytes(this, |kind, bytes| {
        (0..byte_len(kind, bytes)).filter_map(|i| read_index(kind, bytes, i)).collect()
    })
    .unwrap_or_default();
    for (i, item) in items.into_iter().enumerate() {
        interp.call_value(&callback, &undefined(), &[item, number(i as f64), this.clone()])?;
    }
    Ok(undefined())
}

/// Builds the nine `Int8Array`/`Uint8Array`/.../`Float64Array` global
/// constructors, each usable as `new Ctor(length)` or `new Ctor([...])`.
pub fn create_typed_array_constructors(function_prototype: &Value, byte_array_prototype: &Value) -> Vec<(&'static str, Value)> {
    let kinds: [(ByteArrayKind, crate::object::NativeFunction); 10] = [
        (ByteArrayKind::I8, int8_ctor),
        (ByteArrayKind::U8, uint8_ctor),
        (ByteArrayKind::U8Clamped, uint8_clamped_ctor),
        (ByteArrayKind::I16, int16_ctor),
        (ByteArrayKind::U16, uint16_ctor),
        (ByteArrayKind::I32, int32_ctor),
        (ByteArrayKind::U32, uint32_ctor),
        (ByteArrayKind::F16, float16_ctor),
        (ByteArrayKind::F32, float32_ctor),
        (ByteArrayKind::F64, float64_ctor),
    ];
    kinds
        .into_iter()
        .map(|(kind, f)| {
            let ctor = value_object(Object::native_function(kind.name(), 1, f, Some(function_prototype.clone())));
            if let Some(o) = ctor.as_object() {
                o.borrow_mut().set_own("prototype", byte_array_prototype.clone());
            }
            (kind.name(), ctor)
        })
        .collect()
}

fn int8_ctor(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    ctor_body(ByteArrayKind::I8, args, interp)
}
fn uint8_ctor(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    ctor_body(ByteArrayKind::U8, args, interp)
}
fn uint8_clamped_ctor(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    ctor_body(ByteArrayKind::U8Clamped, args, interp)
}
fn int16_ctor(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    ctor_body(ByteArrayKind::I16, args, interp)
}
fn uint16_ctor(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    ctor_body(ByteArrayKind::U16, args, interp)
}
fn int32_ctor(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    ctor_body(ByteArrayKind::I32, args, interp)
}
fn uint32_ctor(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    ctor_body(ByteArrayKind::U32, args, interp)
}
fn float16_ctor(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    ctor_body(ByteArrayKind::F16, args, interp)
}
fn float32_ctor(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    ctor_body(ByteArrayKind::F32, args, interp)
}
fn float64_ctor(_: &Value, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    ctor_body(ByteArrayKind::F64, args, interp)
}

fn ctor_body(kind: ByteArrayKind, args: &[Value], interp: &mut Interpreter) -> JsResult<Value> {
    let arg = args.get(0).cloned().unwrap_or_else(|| number(0.0));
    Ok(construct(kind, &arg, &interp.realm.byte_array_prototype))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_write_wraps_modulo_256() {
        let mut bytes = vec![0u8; 1];
        write_index(ByteArrayKind::U8, &mut bytes, 0, &number(257.0));
        assert_eq!(to_number(&read_index(ByteArrayKind::U8, &bytes, 0).unwrap()), 1.0);
    }

    #[test]
    fn u8_clamped_write_saturates_instead_of_wrapping() {
        let mut bytes = vec![0u8; 1];
        write_index(ByteArrayKind::U8Clamped, &mut bytes, 0, &number(300.0));
        assert_eq!(to_number(&read_index(ByteArrayKind::U8Clamped, &bytes, 0).unwrap()), 255.0);
        write_index(ByteArrayKind::U8Clamped, &mut bytes, 0, &number(-10.0));
        assert_eq!(to_number(&read_index(ByteArrayKind::U8Clamped, &bytes, 0).unwrap()), 0.0);
    }

    #[test]
    fn i8_write_wraps_into_signed_range() {
        let mut bytes = vec![0u8; 1];
        write_index(ByteArrayKind::I8, &mut bytes, 0, &number(200.0));
        assert_eq!(to_number(&read_index(ByteArrayKind::I8, &bytes, 0).unwrap()), -56.0);
    }

    #[test]
    fn u16_write_wraps_modulo_65536() {
        let mut bytes = vec![0u8; 2];
        write_index(ByteArrayKind::U16, &mut bytes, 0, &number(65537.0));
        assert_eq!(to_number(&read_index(ByteArrayKind::U16, &bytes, 0).unwrap()), 1.0);
    }

    #[test]
    fn i32_roundtrips_negative_values() {
        let mut bytes = vec![0u8; 4];
        write_index(ByteArrayKind::I32, &mut bytes, 0, &number(-123456.0));
        assert_eq!(to_number(&read_index(ByteArrayKind::I32, &bytes, 0).unwrap()), -123456.0);
    }

    #[test]
    fn f32_roundtrips_with_float_precision_loss() {
        let mut bytes = vec![0u8; 4];
        write_index(ByteArrayKind::F32, &mut bytes, 0, &number(1.5));
        assert_eq!(to_number(&read_index(ByteArrayKind::F32, &bytes, 0).unwrap()), 1.5);
    }

    #[test]
    fn f64_roundtrips_exactly() {
        let mut bytes = vec![0u8; 8];
        write_index(ByteArrayKind::F64, &mut bytes, 0, &number(3.14159265358979));
        assert_eq!(to_number(&read_index(ByteArrayKind::F64, &bytes, 0).unwrap()), 3.14159265358979);
    }

    #[test]
    fn f16_roundtrips_small_values() {
        let half = f64_to_half(2.5);
        assert_eq!(half_to_f64(half), 2.5);
    }

    #[test]
    fn construct_from_length_zero_fills() {
        let v = construct(ByteArrayKind::U8, &number(4.0), &undefined());
        if let Some(obj) = v.as_object() {
            if let ObjectKind::ByteArray(kind, bytes) = &obj.borrow().kind {
                assert_eq!(byte_len(*kind, bytes), 4);
                assert_eq!(to_number(&read_index(*kind, bytes, 0).unwrap()), 0.0);
            } else {
                panic!("expected ByteArray kind");
            }
        } else {
            panic!("expected object");
        }
    }

    #[test]
    fn out_of_range_index_read_returns_none() {
        let bytes = vec![0u8; 2];
        assert!(read_index(ByteArrayKind::U8, &bytes, 5).is_none());
    }
}
