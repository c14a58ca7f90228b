//! Construction-time settings for a [`Catalog`](crate::Catalog).
//!
//! The process-wide catalog uses [`HelperOptions::default`]. Build a catalog
//! with [`Catalog::with_options`](crate::Catalog::with_options) to change how
//! the time helpers render.
//!
//! ```rust
//! use std::time::Duration;
//! use tmplfuncs::{Catalog, HelperOptions};
//!
//! let options = HelperOptions::new()
//!     .default_timezone("Europe/Paris")
//!     .unwrap()
//!     .time_layout("%d/%m/%Y %H:%M")
//!     .timeago_max(Duration::from_secs(7 * 24 * 3600));
//! let catalog = Catalog::with_options(&options);
//! assert!(catalog.contains("timeIn"));
//! ```

use std::time::Duration;

use chrono_tz::Tz;

use crate::error::ValueError;

/// Zone used by `timeIn` when called with an empty zone name.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;

/// `timeIn` layout: `2024-01-02 08:04 +08`.
pub const DEFAULT_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M %:::z";

/// Past this distance `timeago` prints the date instead.
pub const DEFAULT_TIMEAGO_MAX: Duration = Duration::from_secs(73 * 3600);

pub const DEFAULT_TIMEAGO_LAYOUT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, PartialEq)]
pub struct HelperOptions {
    default_timezone: Tz,
    time_layout: String,
    timeago_max: Duration,
    timeago_layout: String,
}

impl HelperOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the zone `timeIn` falls back to, by IANA name.
    pub fn default_timezone(mut self, name: &str) -> Result<Self, ValueError> {
        self.default_timezone = name
            .parse::<Tz>()
            .map_err(|_| ValueError::UnknownTimezone(name.to_string()))?;
        Ok(self)
    }

    /// Sets the `strftime` layout used by `timeIn`.
    pub fn time_layout(mut self, layout: impl Into<String>) -> Self {
        self.time_layout = layout.into();
        self
    }

    pub fn timeago_max(mut self, max: Duration) -> Self {
        self.timeago_max = max;
        self
    }

    /// Sets the `strftime` layout `timeago` uses past its maximum.
    pub fn timeago_layout(mut self, layout: impl Into<String>) -> Self {
        self.timeago_layout = layout.into();
        self
    }

    pub fn timezone(&self) -> Tz {
        self.default_timezone
    }

    pub fn layout(&self) -> &str {
        &self.time_layout
    }

    pub fn relative_max(&self) -> Duration {
        self.timeago_max
    }

    pub fn relative_layout(&self) -> &str {
        &self.timeago_layout
    }
}

impl Default for HelperOptions {
    fn default() -> Self {
        HelperOptions {
            default_timezone: DEFAULT_TIMEZONE,
            time_layout: DEFAULT_TIME_LAYOUT.to_string(),
            timeago_max: DEFAULT_TIMEAGO_MAX,
            timeago_layout: DEFAULT_TIMEAGO_LAYOUT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = HelperOptions::default();
        assert_eq!(options.timezone(), chrono_tz::Asia::Shanghai);
        assert_eq!(options.layout(), "%Y-%m-%d %H:%M %:::z");
        assert_eq!(options.relative_max(), Duration::from_secs(262_800));
        assert_eq!(options.relative_layout(), "%Y-%m-%d");
    }

    #[test]
    fn test_builder_sets_fields() {
        let options = HelperOptions::new()
            .default_timezone("America/New_York")
            .unwrap()
            .time_layout("%H:%M")
            .timeago_layout("%d.%m.%Y")
            .timeago_max(Duration::from_secs(60));
        assert_eq!(options.timezone(), chrono_tz::America::New_York);
        assert_eq!(options.layout(), "%H:%M");
        assert_eq!(options.relative_layout(), "%d.%m.%Y");
        assert_eq!(options.relative_max(), Duration::from_secs(60));
    }

    #[test]
    fn test_unknown_timezone_is_an_error() {
        let err = HelperOptions::new().default_timezone("Nowhere/Land").unwrap_err();
        assert_eq!(err, ValueError::UnknownTimezone("Nowhere/Land".into()));
    }
}
