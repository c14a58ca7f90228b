//! Query-string escaping and request URI rewriting.
//!
//! The request helpers read the URI of a [`Request`] in the render context,
//! edit its query or path, and write it back out. Query strings are written
//! sorted by key.

use minijinja::Value;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::{fail_soft, Entries};
use crate::values::{Request, RequestTarget};

/// Everything except ASCII alphanumerics and `-_.~` is escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(crate) fn define(entries: &mut Entries) {
    entries.insert("asQuery", Value::from_function(urlencode));
    entries.insert("urlencode", Value::from_function(urlencode));
    entries.insert("getQuery", Value::from_function(get_query));
    entries.insert("setQuery", Value::from_function(set_query));
    entries.insert("delQuery", Value::from_function(del_query));
    entries.insert("parseUrl", Value::from_function(parse_url));
}

/// Escapes a string for use inside a query, spaces as `+`.
pub(crate) fn query_escape(s: &str) -> String {
    s.split(' ')
        .map(|part| utf8_percent_encode(part, QUERY_COMPONENT).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

pub fn urlencode(s: Value) -> String {
    match s.as_str() {
        Some(s) => query_escape(s),
        None => fail_soft("urlencode", "expected a string", String::new()),
    }
}

/// First value of query parameter `k`, or empty.
pub fn get_query(r: Value, k: Value) -> String {
    let (Some(target), Some(key)) = (target(&r), k.as_str()) else {
        return fail_soft("getQuery", "expected a request and a key", String::new());
    };
    target
        .query()
        .remove(key)
        .and_then(|values| values.into_iter().next())
        .unwrap_or_default()
}

/// The request URI with `k` set to the single value `v`.
pub fn set_query(r: Value, k: Value, v: Value) -> String {
    let (Some(mut target), Some(key), Some(value)) = (target(&r), k.as_str(), v.as_str()) else {
        return fail_soft(
            "setQuery",
            "expected a request, a key and a value",
            String::new(),
        );
    };
    let mut values = target.query();
    values.insert(key.to_string(), vec![value.to_string()]);
    target.set_query(&values);
    target.to_string()
}

/// The request URI without parameter `k`.
pub fn del_query(r: Value, k: Value) -> String {
    let (Some(mut target), Some(key)) = (target(&r), k.as_str()) else {
        return fail_soft("delQuery", "expected a request and a key", String::new());
    };
    let mut values = target.query();
    values.remove(key);
    target.set_query(&values);
    target.to_string()
}

/// The request URI with its path replaced by `path`.
pub fn parse_url(path: Value, r: Value) -> String {
    let (Some(path), Some(mut target)) = (path.as_str(), target(&r)) else {
        return fail_soft("parseUrl", "expected a path and a request", String::new());
    };
    target.set_path(path);
    target.to_string()
}

fn target(r: &Value) -> Option<RequestTarget> {
    Request::from_value(r)?.target()
}
