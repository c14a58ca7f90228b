//! Values the helpers accept and the kind checks they dispatch on.
//!
//! MiniJinja's [`Value`] already carries the dynamic kind of everything a
//! template can pass in. This module adds the domain objects callers place in
//! the render context ([`Timestamp`], [`ObjectId`], [`Request`]) and the small
//! accessors every helper uses to validate its arguments before doing any
//! work.

mod object_id;
mod request;
mod timestamp;

pub use object_id::ObjectId;
pub use request::Request;
pub use timestamp::Timestamp;

pub(crate) use request::RequestTarget;

use minijinja::value::{Value, ValueKind};

/// A number normalized across every integer width and float.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    /// Reads a number out of a value; `None` for every other kind.
    ///
    /// Unsigned values above `i128::MAX` are rejected.
    pub(crate) fn from_value(value: &Value) -> Option<Number> {
        if value.kind() != ValueKind::Number {
            return None;
        }
        if value.is_integer() {
            i128::try_from(value.clone()).ok().map(Number::Int)
        } else {
            f64::try_from(value.clone()).ok().map(Number::Float)
        }
    }

    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

/// Integer-kind values only. Floats are rejected even when whole.
pub(crate) fn integer(value: &Value) -> Option<i128> {
    match Number::from_value(value)? {
        Number::Int(i) => Some(i),
        Number::Float(_) => None,
    }
}

/// Integer arguments used as counts, widths and positions.
pub(crate) fn int_arg(value: &Value) -> Option<i64> {
    integer(value).and_then(|i| i64::try_from(i).ok())
}

pub(crate) fn boolean(value: &Value) -> Option<bool> {
    (value.kind() == ValueKind::Bool).then(|| value.is_true())
}

/// Collects a sequence into its items; `None` for non-sequences.
pub(crate) fn seq_items(value: &Value) -> Option<Vec<Value>> {
    if value.kind() != ValueKind::Seq {
        return None;
    }
    value.try_iter().ok().map(|iter| iter.collect())
}

/// A sequence made only of strings, the shape `join` and `existin` expect.
pub(crate) fn string_items(value: &Value) -> Option<Vec<String>> {
    seq_items(value)?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}
