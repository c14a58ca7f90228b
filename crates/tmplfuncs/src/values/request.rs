use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use minijinja::value::{Enumerator, Object, ObjectRepr, Value};
use url::Url;

use crate::helpers::query::query_escape;

/// Host used to resolve origin-form request targets (`/path?query`).
const ORIGIN_BASE: &str = "http://localhost";

/// The request-target of an incoming HTTP request.
///
/// Only the URI is kept: it is all the query helpers read or rewrite.
///
/// ```rust
/// use tmplfuncs::Request;
///
/// let request = Request::new("/search?q=rust&page=2");
/// assert_eq!(request.uri(), "/search?q=rust&page=2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Request {
    uri: String,
}

impl Request {
    pub fn new(uri: impl Into<String>) -> Self {
        Request { uri: uri.into() }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub(crate) fn from_value(value: &Value) -> Option<Request> {
        value.downcast_object_ref::<Request>().cloned()
    }

    /// Parses the URI; `None` unless it is origin-form or absolute.
    pub(crate) fn target(&self) -> Option<RequestTarget> {
        if self.uri.starts_with('/') {
            let url = Url::parse(&format!("{ORIGIN_BASE}{}", self.uri)).ok()?;
            Some(RequestTarget { url, absolute: false })
        } else {
            let url = Url::parse(&self.uri).ok()?;
            Some(RequestTarget { url, absolute: true })
        }
    }
}

impl From<Request> for Value {
    fn from(request: Request) -> Self {
        Value::from_object(request)
    }
}

impl Object for Request {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "uri" => Some(Value::from(self.uri.clone())),
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(&["uri"])
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        Self: Sized + 'static,
    {
        f.write_str(&self.uri)
    }
}

/// A parsed request URI that can be edited and written back out in the
/// same form it came in.
#[derive(Clone, Debug)]
pub(crate) struct RequestTarget {
    url: Url,
    absolute: bool,
}

impl RequestTarget {
    /// Query parameters grouped by key, keys sorted.
    pub(crate) fn query(&self) -> BTreeMap<String, Vec<String>> {
        let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in self.url.query_pairs() {
            values
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        values
    }

    /// Replaces the query with `values`, encoded in key order.
    pub(crate) fn set_query(&mut self, values: &BTreeMap<String, Vec<String>>) {
        let encoded = values
            .iter()
            .flat_map(|(key, vals)| {
                vals.iter()
                    .map(move |val| format!("{}={}", query_escape(key), query_escape(val)))
            })
            .collect::<Vec<_>>()
            .join("&");

        if encoded.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.set_query(Some(&encoded));
        }
    }

    pub(crate) fn set_path(&mut self, path: &str) {
        self.url.set_path(path);
    }
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            return f.write_str(self.url.as_str());
        }
        f.write_str(self.url.path())?;
        if let Some(query) = self.url.query() {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = self.url.fragment() {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}
