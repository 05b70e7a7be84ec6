//! Callable objects: native (Rust-implemented) functions and ordinary
//! (user-defined, `function`/arrow-expression) functions.

use crate::ast::{Node, Param};
use crate::environment::Environment;
use crate::error::JsResult;
use crate::interpreter::Interpreter;
use crate::value::Value;
use gc::{Finalize, Trace};
use std::rc::Rc;

/// Signature every builtin/façade method implements: `(this, args,
/// interpreter) -> JsResult<Value>`, matching the teacher's
/// `NativeFunctionData` shape in `boa::builtins::function`.
pub type NativeFunction = fn(&Value, &[Value], &mut Interpreter) -> JsResult<Value>;

#[derive(Trace, Finalize)]
pub enum Function {
    Native {
        name: String,
        arity: usize,
        #[unsafe_ignore_trace]
        f: NativeFunction,
    },
    Ordinary {
        name: Option<String>,
        #[unsafe_ignore_trace]
        params: Rc<Vec<Param>>,
        #[unsafe_ignore_trace]
        body: Rc<Vec<Node>>,
        /// The environment captured at *definition* time, not call time —
        /// the closure-capture trap spec.md calls out explicitly.
        environment: Environment,
        is_arrow: bool,
    },
}

impl Function {
    pub fn name(&self) -> Option<&str> {
        match self {
            Function::Native { name, .. } => Some(name.as_str()),
            Function::Ordinary { name, .. } => name.as_deref(),
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Function::Native { arity, .. } => *arity,
            Function::Ordinary { params, .. } => {
                params.iter().take_while(|p| p.default.is_none() && !p.rest).count()
            }
        }
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self, Function::Ordinary { is_arrow: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::undefined;

    fn noop(_: &Value, _: &[Value], _: &mut Interpreter) -> JsResult<Value> {
        Ok(undefined())
    }

    #[test]
    fn native_function_reports_its_declared_name_and_arity() {
        let f = Function::Native { name: "log".to_string(), arity: 2, f: noop };
        assert_eq!(f.name(), Some("log"));
        assert_eq!(f.arity(), 2);
        assert!(!f.is_arrow());
    }

    #[test]
    fn ordinary_function_arity_stops_counting_at_the_first_default_or_rest_param() {
        let params = Rc::new(vec![
            Param { name: "a".to_string(), default: None, rest: false },
            Param { name: "b".to_string(), default: Some(Node::NumberLiteral(1.0)), rest: false },
            Param { name: "rest".to_string(), default: None, rest: true },
        ]);
        let f = Function::Ordinary {
            name: Some("f".to_string()),
            params,
            body: Rc::new(vec![]),
            environment: crate::environment::new_environment(None),
            is_arrow: false,
        };
        assert_eq!(f.arity(), 1);
    }

    #[test]
    fn arrow_function_is_flagged_and_anonymous_by_default() {
        let f = Function::Ordinary {
            name: None,
            params: Rc::new(vec![]),
            body: Rc::new(vec![]),
            environment: crate::environment::new_environment(None),
            is_arrow: true,
        };
        assert!(f.is_arrow());
        assert_eq!(f.name(), None);
    }
}
