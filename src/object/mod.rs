//! The object model (§3/§4.A). One `Object` struct serves every object
//! kind (record, array, callable, regex, byte-array); `ObjectKind` tags
//! which native behaviour besides plain property storage it carries.

mod function;
mod initializer;
mod internal_state;

pub use function::{Function, NativeFunction};
pub use initializer::{native_function, ObjectInitializer};
pub use internal_state::{InternalState, InternalStateData};

use crate::value::Value;
use gc::{Finalize, Trace};
use indexmap::IndexMap;
use std::fmt;

#[derive(Trace, Finalize)]
pub enum ObjectKind {
    Ordinary,
    Array,
    Function(Function),
    /// Holds a compiled `regress::Regex` plus `source`/`flags`, opaque to
    /// the GC tracer via `InternalState` (regress values aren't `Trace`).
    Regex(InternalState),
    ByteArray(ByteArrayKind, Vec<u8>),
    /// Opaque Rust-side state for façade objects that need more than a
    /// property bag: timer/worker handles, storage backing maps, console
    /// counters. Mirrors how `Regex` already tunnels non-`Trace` state
    /// through `InternalState`.
    Native(InternalState),
}

#[derive(Trace, Finalize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ByteArrayKind {
    I8,
    U8,
    U8Clamped,
    I16,
    U16,
    I32,
    U32,
    F16,
    F32,
    F64,
}

impl ByteArrayKind {
    pub fn element_size(self) -> usize {
        match self {
            ByteArrayKind::I8 | ByteArrayKind::U8 | ByteArrayKind::U8Clamped => 1,
            ByteArrayKind::I16 | ByteArrayKind::U16 | ByteArrayKind::F16 => 2,
            ByteArrayKind::I32 | ByteArrayKind::U32 | ByteArrayKind::F32 => 4,
            ByteArrayKind::F64 => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ByteArrayKind::I8 => "Int8Array",
            ByteArrayKind::U8 => "Uint8Array",
            ByteArrayKind::U8Clamped => "Uint8ClampedArray",
            ByteArrayKind::I16 => "Int16Array",
            ByteArrayKind::U16 => "Uint16Array",
            ByteArrayKind::I32 => "Int32Array",
            ByteArrayKind::U32 => "Uint32Array",
            ByteArrayKind::F16 => "Float16Array",
            ByteArrayKind::F32 => "Float32Array",
            ByteArrayKind::F64 => "Float64Array",
        }
    }
}

#[derive(Trace, Finalize)]
pub struct Object {
    pub kind: ObjectKind,
    properties: IndexMap<String, Value>,
    prototype: Option<Value>,
    extensible: bool,
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({} props)", self.properties.len())
    }
}

impl Object {
    pub fn new() -> Self {
        Object {
            kind: ObjectKind::Ordinary,
            properties: IndexMap::new(),
            prototype: None,
            extensible: true,
        }
    }

    pub fn with_prototype(prototype: Option<Value>) -> Self {
        let mut obj = Self::new();
        obj.prototype = prototype;
        obj
    }

    pub fn array(prototype: Option<Value>) -> Self {
        let mut obj = Self::with_prototype(prototype);
        obj.kind = ObjectKind::Array;
        obj.properties.insert("length".to_string(), crate::value::number(0.0));
        obj
    }

    pub fn with_kind(kind: ObjectKind, prototype: Option<Value>) -> Self {
        let mut obj = Self::with_prototype(prototype);
        obj.kind = kind;
        obj
    }

    pub fn native_function(
        name: &str,
        arity: usize,
        f: NativeFunction,
        prototype: Option<Value>,
    ) -> Self {
        let mut obj = Self::with_prototype(prototype);
        obj.kind = ObjectKind::Function(Function::Native { name: name.to_string(), arity, f });
        obj
    }

    pub fn prototype(&self) -> Option<&Value> {
        self.prototype.as_ref()
    }

    pub fn set_prototype(&mut self, proto: Option<Value>) {
        self.prototype = proto;
    }

    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ObjectKind::Array)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_))
    }

    pub fn as_function(&self) -> Option<&Function> {
        match &self.kind {
            ObjectKind::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Own-property lookup only; does not walk the prototype chain. Used
    /// by the interpreter to implement "own property shadows prototype
    /// method" for free.
    pub fn get_own(&self, key: &str) -> Option<Value> {
        self.properties.get(key).cloned()
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn set_own(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if self.is_array() {
            if let Ok(index) = key.parse::<u32>() {
                let len = self.array_length();
                if index >= len {
                    self.properties.insert("length".to_string(), crate::value::number((index + 1) as f64));
                }
            }
        }
        self.properties.insert(key, value);
    }

    pub fn delete_own(&mut self, key: &str) -> bool {
        self.properties.shift_remove(key).is_some()
    }

    pub fn own_keys(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    pub fn array_length(&self) -> u32 {
        self.properties
            .get("length")
            .map(|v| crate::value::to_number(v) as u32)
            .unwrap_or(0)
    }

    pub fn set_array_length(&mut self, len: u32) {
        self.properties.insert("length".to_string(), crate::value::number(len as f64));
    }

    pub fn regex_state(&self) -> Option<&InternalState> {
        match &self.kind {
            ObjectKind::Regex(state) => Some(state),
            _ => None,
        }
    }

    pub fn with_native_state<T: InternalStateData + 'static>(state: T, prototype: Option<Value>) -> Self {
        Self::with_kind(ObjectKind::Native(InternalState::new(state)), prototype)
    }

    pub fn native_state(&self) -> Option<&InternalState> {
        match &self.kind {
            ObjectKind::Native(state) => Some(state),
            _ => None,
        }
    }

    /// Grafts native state onto an object built by some other path
    /// (`ObjectInitializer`, an array, a callable) without disturbing its
    /// properties or prototype. Storage/timer/worker handles need this
    /// because their shape comes from `ObjectInitializer::build_value`,
    /// not from `with_native_state`.
    pub fn set_native_state(&mut self, state: InternalState) {
        self.kind = ObjectKind::Native(state);
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::number;

    #[test]
    fn array_set_own_bumps_length_past_highest_index() {
        let mut obj = Object::array(None);
        obj.set_own("0", number(1.0));
        obj.set_own("2", number(3.0));
        assert_eq!(obj.array_length(), 3);
    }

    #[test]
    fn array_set_own_does_not_shrink_length_for_lower_index() {
        let mut obj = Object::array(None);
        obj.set_array_length(5);
        obj.set_own("1", number(9.0));
        assert_eq!(obj.array_length(), 5);
    }

    #[test]
    fn get_own_does_not_walk_prototype_chain() {
        let proto = Object::new();
        let mut proto_obj = proto;
        proto_obj.set_own("inherited", number(1.0));
        let child = Object::new();
        assert!(child.get_own("inherited").is_none());
    }

    #[test]
    fn delete_own_removes_key_and_reports_presence() {
        let mut obj = Object::new();
        obj.set_own("x", number(1.0));
        assert!(obj.has_own("x"));
        assert!(obj.delete_own("x"));
        assert!(!obj.has_own("x"));
        assert!(!obj.delete_own("x"));
    }

    #[test]
    fn own_keys_preserves_insertion_order() {
        let mut obj = Object::new();
        obj.set_own("b", number(1.0));
        obj.set_own("a", number(2.0));
        assert_eq!(obj.own_keys(), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn byte_array_kind_element_sizes() {
        assert_eq!(ByteArrayKind::U8.element_size(), 1);
        assert_eq!(ByteArrayKind::I32.element_size(), 4);
        assert_eq!(ByteArrayKind::F64.element_size(), 8);
        assert_eq!(ByteArrayKind::U16.name(), "Uint16Array");
    }
}
