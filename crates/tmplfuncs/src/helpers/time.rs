//! Relative times, zone conversion and elapsed-time helpers.
//!
//! All four take [`Timestamp`] values only and return an empty string for
//! anything else, including the zero timestamp.

use std::fmt::{Display, Write};

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use minijinja::Value;

use super::{fail_soft, Entries};
use crate::options::HelperOptions;
use crate::values::Timestamp;

const DAY: f64 = 24.0 * 3600.0;

struct Period {
    seconds: f64,
    one: &'static str,
    many: &'static str,
}

const PERIODS: [Period; 6] = [
    Period {
        seconds: 1.0,
        one: "about a second",
        many: "seconds",
    },
    Period {
        seconds: 60.0,
        one: "about a minute",
        many: "minutes",
    },
    Period {
        seconds: 3600.0,
        one: "about an hour",
        many: "hours",
    },
    Period {
        seconds: DAY,
        one: "one day",
        many: "days",
    },
    Period {
        seconds: 30.0 * DAY,
        one: "one month",
        many: "months",
    },
    Period {
        seconds: 365.0 * DAY,
        one: "one year",
        many: "years",
    },
];

pub(crate) fn define(entries: &mut Entries, options: &HelperOptions) {
    let opts = options.clone();
    entries.insert(
        "timeago",
        Value::from_function(move |value: Value| timeago_with(&opts, value)),
    );
    let opts = options.clone();
    entries.insert(
        "timeIn",
        Value::from_function(move |t: Value, loc: Value| time_in_with(&opts, t, loc)),
    );
    entries.insert("duration", Value::from_function(duration));
    entries.insert("renderTime", Value::from_function(render_time));
}

/// English distance from now, e.g. `3 minutes ago` or `in about an hour`.
pub fn timeago_with(options: &HelperOptions, value: Value) -> String {
    match checked("timeago", &value) {
        Some(ts) => relative_text(ts.datetime(), Utc::now().fixed_offset(), options),
        None => String::new(),
    }
}

/// Formats `t` in zone `loc` (IANA name); an empty name means the configured
/// default zone, an unknown one keeps the timestamp's own offset.
pub fn time_in_with(options: &HelperOptions, t: Value, loc: Value) -> String {
    let Some(ts) = checked("timeIn", &t) else {
        return String::new();
    };
    let Some(loc) = loc.as_str() else {
        return fail_soft("timeIn", "expected a zone name", String::new());
    };
    let zone = if loc.is_empty() {
        Some(options.timezone())
    } else {
        loc.parse::<Tz>().ok()
    };
    let at = ts.datetime();
    let formatted = match zone {
        Some(zone) => format_at(&at.with_timezone(&zone), options.layout()),
        None => format_at(&at, options.layout()),
    };
    formatted.unwrap_or_else(|| fail_soft("timeIn", "invalid layout", String::new()))
}

/// Seconds from `start` to `stop` as a float.
pub fn duration(start: Value, stop: Value) -> Value {
    match (checked("duration", &start), checked("duration", &stop)) {
        (Some(start), Some(stop)) => Value::from(seconds(stop.datetime() - start.datetime())),
        _ => Value::from(""),
    }
}

/// Milliseconds elapsed since `start`, e.g. `12.34ms`.
pub fn render_time(start: Value) -> String {
    match checked("renderTime", &start) {
        Some(start) => {
            let elapsed = Utc::now().fixed_offset() - start.datetime();
            format!("{:.2}ms", seconds(elapsed) * 1000.0)
        }
        None => String::new(),
    }
}

fn checked(helper: &'static str, value: &Value) -> Option<Timestamp> {
    match Timestamp::from_value(value) {
        Some(ts) if ts.is_zero() => fail_soft(helper, "zero timestamp", None),
        Some(ts) => Some(ts),
        None => fail_soft(helper, "expected a timestamp", None),
    }
}

fn seconds(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
}

// An invalid strftime layout surfaces as a formatting error, not a panic.
fn format_at<Z: TimeZone>(at: &DateTime<Z>, layout: &str) -> Option<String>
where
    Z::Offset: Display,
{
    let mut out = String::new();
    write!(out, "{}", at.format(layout)).ok()?;
    Some(out)
}

fn relative_text(
    at: DateTime<FixedOffset>,
    reference: DateTime<FixedOffset>,
    options: &HelperOptions,
) -> String {
    let delta = reference - at;
    let past = delta >= TimeDelta::zero();
    let magnitude = if past { delta } else { -delta };

    let beyond_max = magnitude
        .to_std()
        .map_or(true, |m| m >= options.relative_max());
    if beyond_max {
        return format_at(&at, options.relative_layout()).unwrap_or_default();
    }

    let text = period_text(magnitude.num_milliseconds() as f64 / 1000.0);
    if past {
        format!("{text} ago")
    } else {
        format!("in {text}")
    }
}

// Rounds to the nearest unit; a value that rounds up to the next unit is
// worded in that unit ("60 seconds" reads "about a minute").
fn period_text(secs: f64) -> String {
    let zero = PERIODS[0].one.to_string();
    if secs < PERIODS[0].seconds {
        return zero;
    }
    for (i, period) in PERIODS.iter().enumerate() {
        let next = PERIODS.get(i + 1);
        if next.is_some_and(|next| secs >= next.seconds) {
            continue;
        }
        let rounded = (secs / period.seconds + 0.5) as i64;
        if next.is_some_and(|next| rounded == (next.seconds / period.seconds + 0.5) as i64) {
            continue;
        }
        return if rounded == 1 {
            period.one.to_string()
        } else {
            format!("{rounded} {}", period.many)
        };
    }
    zero
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(input: &str) -> Timestamp {
        Timestamp::parse_rfc3339(input).unwrap()
    }

    fn ago(secs: i64) -> String {
        let reference = ts("2024-03-10T12:00:00Z").datetime();
        let at = reference - TimeDelta::seconds(secs);
        relative_text(at, reference, &HelperOptions::default())
    }

    #[test]
    fn test_relative_wording_in_the_past() {
        assert_eq!(ago(0), "about a second ago");
        assert_eq!(ago(1), "about a second ago");
        assert_eq!(ago(30), "30 seconds ago");
        assert_eq!(ago(60), "about a minute ago");
        assert_eq!(ago(90), "2 minutes ago");
        assert_eq!(ago(3600), "about an hour ago");
        assert_eq!(ago(5 * 3600), "5 hours ago");
        assert_eq!(ago(24 * 3600), "one day ago");
        assert_eq!(ago(50 * 3600), "2 days ago");
    }

    #[test]
    fn test_relative_rounds_up_into_next_unit() {
        assert_eq!(ago(3599), "about an hour ago");
    }

    #[test]
    fn test_relative_future() {
        assert_eq!(ago(-2 * 3600), "in 2 hours");
        assert_eq!(ago(-45), "in 45 seconds");
    }

    #[test]
    fn test_relative_past_max_prints_date() {
        assert_eq!(ago(73 * 3600), "2024-03-07");
        assert_eq!(ago(-400 * 24 * 3600), "2025-04-14");
    }

    #[test]
    fn test_timeago_rejects_zero_and_non_timestamps() {
        let options = HelperOptions::default();
        assert_eq!(timeago_with(&options, Value::from(Timestamp::zero())), "");
        assert_eq!(timeago_with(&options, Value::from("2024-01-01")), "");
    }

    #[test]
    fn test_timeago_recent() {
        let options = HelperOptions::default();
        let just_now = Value::from(Timestamp::now());
        assert_eq!(timeago_with(&options, just_now), "about a second ago");
    }

    #[test]
    fn test_time_in_default_zone() {
        let options = HelperOptions::default();
        let t = Value::from(ts("2024-01-02T00:04:00Z"));
        assert_eq!(time_in_with(&options, t, Value::from("")), "2024-01-02 08:04 +08");
    }

    #[test]
    fn test_time_in_named_zone() {
        let options = HelperOptions::default();
        let t = Value::from(ts("2024-07-01T12:00:00Z"));
        assert_eq!(
            time_in_with(&options, t, Value::from("America/New_York")),
            "2024-07-01 08:00 -04"
        );
    }

    #[test]
    fn test_time_in_unknown_zone_keeps_offset() {
        let options = HelperOptions::default();
        let t = Value::from(ts("2024-01-02T00:04:00+02:00"));
        assert_eq!(time_in_with(&options, t, Value::from("Atlantis")), "2024-01-02 00:04 +02");
    }

    #[test]
    fn test_time_in_rejects() {
        let options = HelperOptions::default();
        assert_eq!(time_in_with(&options, Value::from(Timestamp::zero()), Value::from("")), "");
        assert_eq!(time_in_with(&options, Value::from(1), Value::from("")), "");
    }

    #[test]
    fn test_duration() {
        let start = Value::from(ts("2024-01-01T00:00:00Z"));
        let stop = Value::from(ts("2024-01-01T00:01:30.5Z"));
        assert_eq!(duration(start.clone(), stop), Value::from(90.5));
        assert_eq!(duration(start, Value::from(Timestamp::zero())), Value::from(""));
    }

    #[test]
    fn test_render_time() {
        let out = render_time(Value::from(Timestamp::now()));
        assert!(out.ends_with("ms"), "{out}");
        assert_eq!(render_time(Value::from("now")), "");
    }
}
