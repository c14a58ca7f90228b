//! Casing, trimming, padding and truncation of strings.
//!
//! Lengths, widths and positions count chars, so multi-byte text is never
//! split in the middle of a character.

use minijinja::Value;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{fail_soft, Entries};
use crate::values::{int_arg, integer};

/// Upper bound in bytes on what `repeat` and the justify helpers may build.
pub const MAX_OUTPUT_LEN: usize = 1 << 24;

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("<[^>]*?>").expect("tag pattern is valid"));

pub(crate) fn define(entries: &mut Entries) {
    entries.insert("lower", Value::from_function(lower));
    entries.insert("upper", Value::from_function(upper));
    entries.insert("title", Value::from_function(title));
    entries.insert("capfirst", Value::from_function(capfirst));
    entries.insert("trim", Value::from_function(trim));
    entries.insert("isblank", Value::from_function(isblank));
    entries.insert("truncatechars", Value::from_function(truncatechars));
    entries.insert("replace", Value::from_function(replace));
    entries.insert("findreplace", Value::from_function(findreplace));
    entries.insert("gettitle", Value::from_function(gettitle));
    entries.insert("repeat", Value::from_function(repeat));
    entries.insert("rjust", Value::from_function(rjust));
    entries.insert("ljust", Value::from_function(ljust));
    entries.insert("center", Value::from_function(center));
    entries.insert("wordcount", Value::from_function(wordcount));
    entries.insert("striptags", Value::from_function(striptags));
    entries.insert("pluralize", Value::from_function(pluralize));
}

pub fn lower(s: Value) -> String {
    match s.as_str() {
        Some(s) => s.to_lowercase(),
        None => fail_soft("lower", "expected a string", String::new()),
    }
}

pub fn upper(s: Value) -> String {
    match s.as_str() {
        Some(s) => s.to_uppercase(),
        None => fail_soft("upper", "expected a string", String::new()),
    }
}

/// Upper-cases the first letter of every word.
pub fn title(s: Value) -> String {
    match s.as_str() {
        Some(s) => title_case(s),
        None => fail_soft("title", "expected a string", String::new()),
    }
}

pub fn capfirst(s: Value) -> String {
    let Some(s) = s.as_str() else {
        return fail_soft("capfirst", "expected a string", String::new());
    };
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => fail_soft("capfirst", "empty string", String::new()),
    }
}

pub fn trim(s: Value) -> String {
    match s.as_str() {
        Some(s) => s.trim().to_string(),
        None => fail_soft("trim", "expected a string", String::new()),
    }
}

pub fn isblank(value: Value) -> bool {
    match value.as_str() {
        Some(s) => s.trim().is_empty(),
        None => fail_soft("isblank", "expected a string", false),
    }
}

/// Shortens `s` to `n` chars, ending with `...` when there is room for it.
pub fn truncatechars(n: Value, s: Value) -> String {
    match (int_arg(&n), s.as_str()) {
        (Some(n), Some(s)) => truncate_chars(n, s),
        _ => fail_soft(
            "truncatechars",
            "expected an integer and a string",
            String::new(),
        ),
    }
}

/// Removes every occurrence of `s1` from `s2`.
pub fn replace(s1: Value, s2: Value) -> String {
    match (s1.as_str(), s2.as_str()) {
        (Some(needle), Some(haystack)) => haystack.replace(needle, ""),
        _ => fail_soft("replace", "expected strings", String::new()),
    }
}

/// Replaces every `s1` in `s3` with `s2`.
pub fn findreplace(s1: Value, s2: Value, s3: Value) -> String {
    match (s1.as_str(), s2.as_str(), s3.as_str()) {
        (Some(from), Some(to), Some(haystack)) => haystack.replace(from, to),
        _ => fail_soft("findreplace", "expected strings", String::new()),
    }
}

/// The segment after the last `.`, e.g. `models.Post` → `Post`.
pub fn gettitle(value: Value) -> String {
    match value.as_str() {
        Some(s) => s.rsplit('.').next().unwrap_or(s).to_string(),
        None => fail_soft("gettitle", "expected a string", String::new()),
    }
}

pub fn repeat(count: Value, s: Value) -> String {
    let count = int_arg(&count).and_then(|c| usize::try_from(c).ok());
    let (Some(count), Some(s)) = (count, s.as_str()) else {
        return fail_soft(
            "repeat",
            "expected a non-negative count and a string",
            String::new(),
        );
    };
    match s.len().checked_mul(count) {
        Some(size) if size <= MAX_OUTPUT_LEN => s.repeat(count),
        _ => fail_soft("repeat", "output too large", String::new()),
    }
}

/// Right-aligns `value` in a field of `width` chars.
pub fn rjust(width: Value, value: Value) -> String {
    justify("rjust", width, value, |pad, s| format!("{}{}", " ".repeat(pad), s))
}

/// Left-aligns `value` in a field of `width` chars.
pub fn ljust(width: Value, value: Value) -> String {
    justify("ljust", width, value, |pad, s| format!("{}{}", s, " ".repeat(pad)))
}

/// Centers `value` in a field of `width` chars; odd padding goes right.
pub fn center(width: Value, value: Value) -> String {
    justify("center", width, value, |pad, s| {
        let left = pad / 2;
        format!("{}{}{}", " ".repeat(left), s, " ".repeat(pad - left))
    })
}

pub fn wordcount(s: Value) -> usize {
    match s.as_str() {
        Some(s) => s.split_whitespace().count(),
        None => fail_soft("wordcount", "expected a string", 0),
    }
}

/// Drops anything that looks like an HTML tag and trims the rest.
///
/// This is a display helper, not a sanitizer.
pub fn striptags(s: Value) -> String {
    match s.as_str() {
        Some(s) => TAG_PATTERN.replace_all(s, "").trim().to_string(),
        None => fail_soft("striptags", "expected a string", String::new()),
    }
}

/// Picks the singular or plural suffix for a count.
///
/// `arg` is either the plural suffix alone (`"s"`) or `"singular,plural"`.
pub fn pluralize(arg: Value, value: Value) -> String {
    let (Some(arg), Some(count)) = (arg.as_str(), integer(&value)) else {
        return fail_soft(
            "pluralize",
            "expected a suffix string and an integer",
            String::new(),
        );
    };
    let bits: Vec<&str> = if arg.contains(',') {
        arg.split(',').collect()
    } else {
        vec!["", arg]
    };
    match bits.as_slice() {
        [singular, plural] => {
            if count == 1 {
                singular.to_string()
            } else {
                plural.to_string()
            }
        }
        _ => fail_soft("pluralize", "more than one comma in suffix", String::new()),
    }
}

fn truncate_chars(n: i64, s: &str) -> String {
    let Ok(n) = usize::try_from(n) else {
        return s.to_string();
    };
    let len = s.chars().count();
    if n >= len {
        return s.to_string();
    }
    if n > 3 && len > 3 {
        let mut out: String = s.chars().take(n - 3).collect();
        out.push_str("...");
        return out;
    }
    s.chars().take(n).collect()
}

fn justify(
    helper: &'static str,
    width: Value,
    value: Value,
    pad: impl Fn(usize, &str) -> String,
) -> String {
    let (Some(width), Some(s)) = (int_arg(&width), value.as_str()) else {
        return fail_soft(helper, "expected an integer width and a string", String::new());
    };
    let len = s.chars().count();
    let width = usize::try_from(width).unwrap_or(0);
    if width <= len {
        return s.to_string();
    }
    let fill = width - len;
    match fill.checked_add(s.len()) {
        Some(size) if size <= MAX_OUTPUT_LEN => pad(fill, s),
        _ => fail_soft(helper, "output too large", String::new()),
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev = ' ';
    for c in s.chars() {
        if is_word_separator(prev) {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev = c;
    }
    out
}

// ASCII punctuation splits words ("o'neil" → "O'Neil"); outside ASCII only
// whitespace does.
fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}
