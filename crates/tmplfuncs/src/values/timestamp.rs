use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use minijinja::value::{Enumerator, Object, ObjectRepr, Value};

use crate::error::ValueError;

/// Unix seconds of `0001-01-01T00:00:00Z`, the zero timestamp.
const ZERO_UNIX_SECONDS: i64 = -62_135_596_800;

/// A point in time with its UTC offset, as consumed by the time helpers.
///
/// The zero timestamp (`0001-01-01T00:00:00Z`, also [`Default`]) stands for
/// "no time set"; every time helper returns an empty string for it.
///
/// ```rust
/// use tmplfuncs::Timestamp;
///
/// let ts = Timestamp::parse_rfc3339("2024-01-02T00:04:00Z").unwrap();
/// assert!(!ts.is_zero());
/// assert!(Timestamp::zero().is_zero());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    pub fn new<Tz: TimeZone>(at: DateTime<Tz>) -> Self {
        Timestamp(at.fixed_offset())
    }

    pub fn now() -> Self {
        Timestamp::new(Utc::now())
    }

    pub fn zero() -> Self {
        let zero = DateTime::<Utc>::from_timestamp(ZERO_UNIX_SECONDS, 0)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Timestamp::new(zero)
    }

    pub fn parse_rfc3339(input: &str) -> Result<Self, ValueError> {
        DateTime::parse_from_rfc3339(input)
            .map(Timestamp)
            .map_err(|_| ValueError::InvalidTimestamp(input.to_string()))
    }

    pub fn is_zero(&self) -> bool {
        self.0.timestamp() == ZERO_UNIX_SECONDS && self.0.timestamp_subsec_nanos() == 0
    }

    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// Reads a timestamp out of a template value.
    pub(crate) fn from_value(value: &Value) -> Option<Timestamp> {
        value.downcast_object_ref::<Timestamp>().copied()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::zero()
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(at: DateTime<Tz>) -> Self {
        Timestamp::new(at)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::from_object(ts)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

impl Object for Timestamp {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        use chrono::{Datelike, Timelike};

        let at = self.0;
        match key.as_str()? {
            "unix" => Some(Value::from(at.timestamp())),
            "year" => Some(Value::from(at.year())),
            "month" => Some(Value::from(at.month())),
            "day" => Some(Value::from(at.day())),
            "hour" => Some(Value::from(at.hour())),
            "minute" => Some(Value::from(at.minute())),
            "second" => Some(Value::from(at.second())),
            "is_zero" => Some(Value::from(self.is_zero())),
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(&[
            "unix", "year", "month", "day", "hour", "minute", "second", "is_zero",
        ])
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        Self: Sized + 'static,
    {
        fmt::Display::fmt(self.as_ref(), f)
    }
}
