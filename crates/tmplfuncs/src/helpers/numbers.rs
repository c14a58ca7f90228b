//! Number formatting: separators, ordinals, file sizes and small arithmetic.

use minijinja::Value;

use super::{fail_soft, Entries};
use crate::values::{integer, Number};

const AP_NUMBERS: [&str; 9] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

const SI_SIZES: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

pub(crate) fn define(entries: &mut Entries) {
    entries.insert("intcomma", Value::from_function(intcomma));
    entries.insert("ordinal", Value::from_function(ordinal));
    entries.insert("apnumber", Value::from_function(apnumber));
    entries.insert("filesizeformat", Value::from_function(filesizeformat));
    entries.insert("humanizeSize", Value::from_function(humanize_size));
    entries.insert("divisibleby", Value::from_function(divisibleby));
    entries.insert("minus", Value::from_function(minus));
    entries.insert("getInt", Value::from_function(get_int));
}

/// Groups the digits of an integer in threes: `-1234567` → `-1,234,567`.
pub fn intcomma(value: Value) -> String {
    match integer(&value) {
        Some(n) => group_thousands(n),
        None => fail_soft("intcomma", "expected an integer", String::new()),
    }
}

/// English ordinal: `1st`, `2nd`, `11th`, `21st`.
pub fn ordinal(value: Value) -> String {
    match integer(&value) {
        Some(n) if n >= 0 => {
            let suffix = match (n % 100, n % 10) {
                (11..=13, _) => "th",
                (_, 1) => "st",
                (_, 2) => "nd",
                (_, 3) => "rd",
                _ => "th",
            };
            format!("{n}{suffix}")
        }
        Some(_) => fail_soft("ordinal", "negative number", String::new()),
        None => fail_soft("ordinal", "expected an integer", String::new()),
    }
}

/// Spells out 1 through 9 (`4` → `four`); other values pass through.
pub fn apnumber(value: Value) -> Value {
    match integer(&value) {
        Some(n @ 1..=9) => Value::from(AP_NUMBERS[(n - 1) as usize]),
        Some(n) if n < 1 => {
            fail_soft("apnumber", "no word for numbers below one", Value::from(""))
        }
        _ => value,
    }
}

/// Binary (1024-based) file size with one decimal, e.g. `1.5 KB`.
pub fn filesizeformat(value: Value) -> String {
    match Number::from_value(&value) {
        Some(n) => format_file_size(n.as_f64()),
        None => fail_soft("filesizeformat", "expected a number", String::new()),
    }
}

/// Decimal (1000-based) size, e.g. `83 MB`; `NA` for anything else.
pub fn humanize_size(size: Value) -> String {
    let bytes = match Number::from_value(&size) {
        Some(Number::Int(n)) => u64::try_from(n).ok(),
        Some(Number::Float(f)) if f >= 0.0 => Some(f.trunc() as u64),
        _ => None,
    };
    match bytes {
        Some(bytes) => humanize_bytes(bytes),
        None => fail_soft(
            "humanizeSize",
            "expected a non-negative number",
            "NA".to_string(),
        ),
    }
}

/// Whether `value` is an exact multiple of `arg`.
pub fn divisibleby(arg: Value, value: Value) -> bool {
    match (Number::from_value(&arg), Number::from_value(&value)) {
        (Some(arg), Some(value)) => value.as_f64() % arg.as_f64() == 0.0,
        _ => fail_soft("divisibleby", "expected two numbers", false),
    }
}

pub fn minus(value: Value, i: Value) -> Value {
    match (integer(&value), integer(&i)) {
        (Some(value), Some(i)) => match value.checked_sub(i) {
            Some(diff) => Value::from(diff),
            None => fail_soft("minus", "overflow", Value::from(0)),
        },
        _ => fail_soft("minus", "expected two integers", Value::from(0)),
    }
}

pub fn get_int(value: Value) -> Value {
    match integer(&value) {
        Some(n) => Value::from(n),
        None => fail_soft("getInt", "expected an integer", Value::from(0)),
    }
}

fn group_thousands(n: i128) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

fn format_file_size(size: f64) -> String {
    const KB: f64 = (1u64 << 10) as f64;
    const MB: f64 = (1u64 << 20) as f64;
    const GB: f64 = (1u64 << 30) as f64;
    const TB: f64 = (1u64 << 40) as f64;
    const PB: f64 = (1u64 << 50) as f64;

    let (scaled, unit) = if size < KB {
        (size, "bytes")
    } else if size < MB {
        (size / KB, "KB")
    } else if size < GB {
        (size / MB, "MB")
    } else if size < TB {
        (size / GB, "GB")
    } else if size < PB {
        (size / TB, "TB")
    } else {
        (size / PB, "PB")
    };
    format!("{scaled:.1} {unit}").replace(".0", "")
}

fn humanize_bytes(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{bytes} B");
    }
    let size = bytes as f64;
    let exp = (size.ln() / 1000f64.ln()).floor();
    let unit = SI_SIZES
        .get(exp as usize)
        .copied()
        .unwrap_or(SI_SIZES[SI_SIZES.len() - 1]);
    let scaled = (size / 1000f64.powf(exp) * 10.0 + 0.5).floor() / 10.0;
    if scaled < 10.0 {
        format!("{scaled:.1} {unit}")
    } else {
        format!("{scaled:.0} {unit}")
    }
}
