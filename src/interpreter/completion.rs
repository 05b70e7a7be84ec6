//! `Completion` generalizes the teacher's single `is_return: bool` flag on
//! `Interpreter` (`boa::exec::Interpreter`) into a value that composes
//! with `break`/`continue`/labels, so `finally` blocks run on every exit
//! path (§4.D, §8).

use crate::value::Value;

#[derive(Debug, Clone)]
pub enum Completion {
    Normal(Value),
    Return(Value),
    Break(Option<String>),
    Continue(Option<String>),
}

impl Completion {
    pub fn value(&self) -> Value {
        match self {
            Completion::Normal(v) | Completion::Return(v) => v.clone(),
            _ => crate::value::undefined(),
        }
    }

    pub fn is_abrupt(&self) -> bool {
        !matches!(self, Completion::Normal(_))
    }
}
