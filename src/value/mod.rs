//! The value model (§3). `Value` is a cheap-to-clone GC handle; primitives
//! are never boxed, they dispatch to a prototype table on member access
//! instead (see `crate::prototypes`).

mod conversions;
mod ops;

pub use conversions::*;
pub use ops::*;

use crate::object::Object;
use gc::{Finalize, Gc, GcCell, Trace};
use std::fmt;

/// A handle to a JS value. Cloning is a refcount bump, never a deep copy.
pub type Value = Gc<ValueData>;

#[derive(Trace, Finalize)]
pub enum ValueData {
    Null,
    Undefined,
    Boolean(bool),
    Number(f64),
    String(String),
    Object(GcCell<Object>),
}

impl fmt::Debug for ValueData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueData::Null => write!(f, "null"),
            ValueData::Undefined => write!(f, "undefined"),
            ValueData::Boolean(b) => write!(f, "{}", b),
            ValueData::Number(n) => write!(f, "{}", n),
            ValueData::String(s) => write!(f, "{:?}", s),
            ValueData::Object(_) => write!(f, "<object>"),
        }
    }
}

pub fn undefined() -> Value {
    Gc::new(ValueData::Undefined)
}

pub fn null() -> Value {
    Gc::new(ValueData::Null)
}

pub fn boolean(b: bool) -> Value {
    Gc::new(ValueData::Boolean(b))
}

pub fn number(n: f64) -> Value {
    Gc::new(ValueData::Number(n))
}

pub fn string<S: Into<String>>(s: S) -> Value {
    Gc::new(ValueData::String(s.into()))
}

pub fn object(obj: Object) -> Value {
    Gc::new(ValueData::Object(GcCell::new(obj)))
}

/// Accessors shared by callers that don't want to match on `ValueData`
/// directly every time.
pub trait ValueExt {
    fn is_undefined(&self) -> bool;
    fn is_null(&self) -> bool;
    fn is_null_or_undefined(&self) -> bool;
    fn is_object(&self) -> bool;
    fn is_string(&self) -> bool;
    fn is_number(&self) -> bool;
    fn is_boolean(&self) -> bool;
    fn as_object(&self) -> Option<&GcCell<Object>>;
    /// Best-effort human string used only for `JsError`'s `Display` impl;
    /// never used for JS-observable string conversion (see `to_js_string`).
    fn display_for_error(&self) -> String;
}

impl ValueExt for Value {
    fn is_undefined(&self) -> bool {
        matches!(**self, ValueData::Undefined)
    }
    fn is_null(&self) -> bool {
        matches!(**self, ValueData::Null)
    }
    fn is_null_or_undefined(&self) -> bool {
        self.is_undefined() || self.is_null()
    }
    fn is_object(&self) -> bool {
        matches!(**self, ValueData::Object(_))
    }
    fn is_string(&self) -> bool {
        matches!(**self, ValueData::String(_))
    }
    fn is_number(&self) -> bool {
        matches!(**self, ValueData::Number(_))
    }
    fn is_boolean(&self) -> bool {
        matches!(**self, ValueData::Boolean(_))
    }
    fn as_object(&self) -> Option<&GcCell<Object>> {
        match &**self {
            ValueData::Object(o) => Some(o),
            _ => None,
        }
    }
    fn display_for_error(&self) -> String {
        match &**self {
            ValueData::Object(o) => {
                let obj = o.borrow();
                obj.get_own("message")
                    .map(|v| to_js_string(&v))
                    .unwrap_or_else(|| "[object Object]".to_string())
            }
            other => conversions::value_data_to_display(other),
        }
    }
}
