//! Prototype method tables for primitives (§4.A), grounded method-for-
//! method on `examples/original_source/js_properties.py`'s
//! `array_prototype`/`string_prototype`/`object_prototype`/
//! `number_prototype`, translated from Python closures-over-a-list into
//! native functions operating on `&Object`/`Value`.

pub mod array;
pub mod byte_array;
pub mod error;
pub mod number;
pub mod object;
pub mod regexp;
pub mod string;

pub use error::{create_error_constructors, install_error_prototype};
pub use number::{create_number_constructor, install_number_prototype};
pub use object::{create_object_namespace, install_object_prototype};
pub use regexp::{create_regexp_constructor, install_regexp_prototype};

pub use array::{create_array_constructor, install_array_prototype};
pub use byte_array::{create_typed_array_constructors, from_bytes, install_byte_array_prototype, raw_bytes, set_raw_bytes};
pub use string::{create_string_constructor, install_string_prototype};
