//! Rust-level error plumbing for abrupt completions that escape the
//! interpreter entirely (as opposed to a JS `throw` caught by a JS `catch`,
//! which is handled inside `interpreter` via `Completion::Throw`).

use crate::value::Value;
use std::fmt;

/// The ECMAScript error kinds this crate raises. `Syntax` is only ever
/// constructed by an external parser handing back a parse failure; the
/// interpreter itself never produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsErrorKind {
    Reference,
    Type,
    Range,
    Uri,
    Syntax,
}

impl JsErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            JsErrorKind::Reference => "ReferenceError",
            JsErrorKind::Type => "TypeError",
            JsErrorKind::Range => "RangeError",
            JsErrorKind::Uri => "URIError",
            JsErrorKind::Syntax => "SyntaxError",
        }
    }
}

/// A thrown value that has unwound out of `Engine::run`. Carries both the
/// raw JS value (so an embedder can inspect `.message`/`.stack`) and a
/// kind tag for the common native-error case.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", self.display_message())]
pub struct JsError {
    pub kind: JsErrorKind,
    pub value: Value,
}

impl JsError {
    pub fn new(kind: JsErrorKind, value: Value) -> Self {
        JsError { kind, value }
    }

    fn display_message(&self) -> String {
        format!("{}: {}", self.kind.name(), self.value.display_for_error())
    }
}

pub type JsResult<T> = Result<T, JsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::string;

    #[test]
    fn display_message_prefixes_the_error_kind_name() {
        let err = JsError::new(JsErrorKind::Type, string("bad thing"));
        assert_eq!(err.to_string(), "TypeError: bad thing");
    }

    #[test]
    fn each_kind_maps_to_its_ecmascript_constructor_name() {
        assert_eq!(JsErrorKind::Reference.name(), "ReferenceError");
        assert_eq!(JsErrorKind::Range.name(), "RangeError");
        assert_eq!(JsErrorKind::Uri.name(), "URIError");
        assert_eq!(JsErrorKind::Syntax.name(), "SyntaxError");
    }
}
