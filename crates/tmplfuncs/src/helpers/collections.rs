//! Emptiness, length, membership and element picking over strings,
//! sequences and maps.

use std::time::{SystemTime, UNIX_EPOCH};

use minijinja::value::{Rest, Value, ValueKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{fail_soft, Entries};
use crate::values::{boolean, int_arg, seq_items, string_items};

pub(crate) fn define(entries: &mut Entries) {
    entries.insert("default", Value::from_function(default_value));
    entries.insert("length", Value::from_function(length));
    entries.insert("lengthis", Value::from_function(lengthis));
    entries.insert("first", Value::from_function(first));
    entries.insert("last", Value::from_function(last));
    entries.insert("slice", Value::from_function(slice));
    entries.insert("join", Value::from_function(join));
    entries.insert("random", Value::from_function(random));
    entries.insert("randomintrange", Value::from_function(randomintrange));
    entries.insert("existin", Value::from_function(existin));
    entries.insert("isChecked", Value::from_function(is_checked));
    entries.insert("funcMap", Value::from_function(func_map));
    entries.insert("istrue", Value::from_function(istrue));
    entries.insert("yesno", Value::from_function(yesno));
}

/// `arg` when `value` is an empty string, sequence or map, or `false`;
/// otherwise `value`, including zero numbers and none.
pub fn default_value(arg: Value, value: Value) -> Value {
    let empty = match value.kind() {
        ValueKind::String | ValueKind::Seq | ValueKind::Map => value.len() == Some(0),
        ValueKind::Bool => !value.is_true(),
        _ => false,
    };
    if empty {
        arg
    } else {
        value
    }
}

/// Chars in a string, items in a sequence or map.
pub fn length(value: Value) -> usize {
    match measure(&value) {
        Some(len) => len,
        None => fail_soft("length", "expected a string, sequence or map", 0),
    }
}

pub fn lengthis(arg: Value, value: Value) -> bool {
    match (int_arg(&arg), measure(&value)) {
        (Some(expected), Some(len)) => i64::try_from(len).is_ok_and(|len| len == expected),
        _ => fail_soft(
            "lengthis",
            "expected an integer and a measurable value",
            false,
        ),
    }
}

pub fn first(value: Value) -> Value {
    pick(&value, |items| items.next())
        .unwrap_or_else(|| fail_soft("first", "empty or unsupported value", Value::from("")))
}

pub fn last(value: Value) -> Value {
    pick(&value, |items| items.last())
        .unwrap_or_else(|| fail_soft("last", "empty or unsupported value", Value::from("")))
}

/// Items `start..end` of a string (by char) or sequence.
///
/// A negative `start` counts as zero. For strings `end` is clamped to the
/// length; for sequences an `end` past the length is rejected.
pub fn slice(start: Value, end: Value, value: Value) -> Value {
    let (Some(start), Some(end)) = (int_arg(&start), int_arg(&end)) else {
        return fail_soft("slice", "expected integer bounds", Value::from(""));
    };
    let start = usize::try_from(start.max(0)).unwrap_or(usize::MAX);
    let Ok(end) = usize::try_from(end) else {
        return fail_soft("slice", "negative end", Value::from(""));
    };

    if let Some(s) = value.as_str() {
        let chars: Vec<char> = s.chars().collect();
        let end = end.min(chars.len());
        return match chars.get(start..end) {
            Some(part) => Value::from(part.iter().collect::<String>()),
            None => fail_soft("slice", "start past end", Value::from("")),
        };
    }
    match seq_items(&value) {
        Some(items) => match items.get(start..end) {
            Some(part) => Value::from(part.to_vec()),
            None => fail_soft("slice", "bounds outside the sequence", Value::from("")),
        },
        None => fail_soft("slice", "expected a string or sequence", Value::from("")),
    }
}

pub fn join(arg: Value, value: Value) -> String {
    match (arg.as_str(), string_items(&value)) {
        (Some(sep), Some(items)) => items.join(sep),
        _ => fail_soft(
            "join",
            "expected a separator and a sequence of strings",
            String::new(),
        ),
    }
}

/// A random char of a string or item of a sequence.
pub fn random(value: Value) -> Value {
    let mut rng = reseeded_rng();
    if let Some(s) = value.as_str() {
        let chars: Vec<char> = s.chars().collect();
        return match chars.choose(&mut rng) {
            Some(c) => Value::from(c.to_string()),
            None => fail_soft("random", "empty string", Value::from("")),
        };
    }
    match seq_items(&value) {
        Some(items) => match items.choose(&mut rng) {
            Some(item) => item.clone(),
            None => fail_soft("random", "empty sequence", Value::from("")),
        },
        None => fail_soft("random", "expected a string or sequence", Value::from("")),
    }
}

/// A uniform integer in `[min, max)`. `value` is ignored.
pub fn randomintrange(min: Value, max: Value, _value: Value) -> i64 {
    match (int_arg(&min), int_arg(&max)) {
        (Some(min), Some(max)) if min < max => reseeded_rng().gen_range(min..max),
        (Some(_), Some(_)) => fail_soft("randomintrange", "empty range", 0),
        _ => fail_soft("randomintrange", "expected integer bounds", 0),
    }
}

pub fn existin(list: Value, value: Value) -> bool {
    match (seq_items(&list), value.as_str()) {
        (Some(items), Some(needle)) => items.iter().any(|item| item.as_str() == Some(needle)),
        _ => fail_soft("existin", "expected a sequence and a string", false),
    }
}

/// `"checked"` when `option` is one of `values`, for checkbox inputs.
pub fn is_checked(values: Value, option: Value) -> String {
    let (Some(values), Some(option)) = (seq_items(&values), option.as_str()) else {
        return fail_soft(
            "isChecked",
            "expected a sequence and a string",
            String::new(),
        );
    };
    if values.iter().any(|item| item.as_str() == Some(option)) {
        "checked".to_string()
    } else {
        String::new()
    }
}

/// Collects its arguments into a sequence.
pub fn func_map(values: Rest<Value>) -> Value {
    Value::from(values.0)
}

pub fn istrue(value: Value) -> bool {
    boolean(&value).unwrap_or(false)
}

pub fn yesno(yes: Value, no: Value, value: Value) -> String {
    match (yes.as_str(), no.as_str(), boolean(&value)) {
        (Some(yes), _, Some(true)) => yes.to_string(),
        (_, Some(no), Some(false)) => no.to_string(),
        _ => fail_soft("yesno", "expected two strings and a boolean", String::new()),
    }
}

fn measure(value: &Value) -> Option<usize> {
    match value.kind() {
        ValueKind::String => value.as_str().map(|s| s.chars().count()),
        ValueKind::Seq | ValueKind::Map => value.len(),
        _ => None,
    }
}

fn pick(
    value: &Value,
    select: impl FnOnce(&mut dyn Iterator<Item = Value>) -> Option<Value>,
) -> Option<Value> {
    if let Some(s) = value.as_str() {
        let mut chars = s.chars().map(|c| Value::from(c.to_string()));
        return select(&mut chars);
    }
    let items = seq_items(value)?;
    select(&mut items.into_iter())
}

// Reseeded from the clock on every call.
fn reseeded_rng() -> StdRng {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default();
    StdRng::seed_from_u64(nanos)
}
