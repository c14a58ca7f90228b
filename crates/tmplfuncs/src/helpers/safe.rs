//! Trust markers for pre-escaped content.
//!
//! These mark a string as already safe for its output context so the engine
//! skips auto-escaping. They do not sanitize anything; the caller vouches for
//! the content. MiniJinja tracks a single "safe" flag, so the HTML, CSS, JS,
//! attribute and URL markers all set that same flag.

use minijinja::Value;

use super::{fail_soft, Entries};

pub(crate) fn define(entries: &mut Entries) {
    entries.insert("asHTML", Value::from_function(as_html));
    entries.insert("asCSS", Value::from_function(as_css));
    entries.insert("asJS", Value::from_function(as_js));
    entries.insert("asHTMLAttr", Value::from_function(as_html_attr));
    entries.insert("asURL", Value::from_function(as_url));
    entries.insert("tojson", Value::from_function(tojson));
}

pub fn as_html(value: Value) -> Value {
    trust("asHTML", value)
}

pub fn as_css(value: Value) -> Value {
    trust("asCSS", value)
}

pub fn as_js(value: Value) -> Value {
    trust("asJS", value)
}

pub fn as_html_attr(value: Value) -> Value {
    trust("asHTMLAttr", value)
}

pub fn as_url(value: Value) -> Value {
    trust("asURL", value)
}

/// JSON text of any value, safe to embed in a script block.
///
/// `<`, `>` and `&` are written as `\u` escapes so the output cannot close
/// the surrounding `<script>` element.
pub fn tojson(value: Value) -> Value {
    match serde_json::to_string(&value) {
        Ok(json) => Value::from_safe_string(
            json.replace('<', "\\u003c")
                .replace('>', "\\u003e")
                .replace('&', "\\u0026")
                .replace('\u{2028}', "\\u2028")
                .replace('\u{2029}', "\\u2029"),
        ),
        Err(_) => fail_soft(
            "tojson",
            "value is not serializable",
            Value::from_safe_string(String::new()),
        ),
    }
}

fn trust(helper: &'static str, value: Value) -> Value {
    match value.as_str() {
        Some(s) => Value::from_safe_string(s.to_string()),
        None => fail_soft(
            helper,
            "expected a string",
            Value::from_safe_string(String::new()),
        ),
    }
}
