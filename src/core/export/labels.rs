//! Customer export link labels
//!
//! The customers page lists finished exports as links labelled with the
//! minute the export was requested, rendered in the account's time zone.
//! Booker tends to round that minute up, so the search starts slightly after
//! the click and then tries the neighbouring minutes.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// Label format of the export history links, e.g. `Jan 5, 2024  3:45 pm`
pub const LINK_LABEL_FORMAT: &str = "%b %-d, %Y  %-I:%M %p";

/// Offset from the export click to the first probed minute
pub const ANCHOR_OFFSET_SECS: i64 = 15;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Renders `at` as an export link label in `tz`
pub fn link_label(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz)
        .format(LINK_LABEL_FORMAT)
        .to_string()
        .replace("AM", "am")
        .replace("PM", "pm")
}

/// The instants probed for an export triggered at `trigger`, in order
///
/// The anchor is `trigger + 15s`; then one minute later, then one minute
/// earlier.
pub fn probe_times(trigger: DateTime<Utc>) -> [DateTime<Utc>; 3] {
    let anchor = trigger + Duration::seconds(ANCHOR_OFFSET_SECS);
    [
        anchor,
        anchor + Duration::minutes(1),
        anchor - Duration::minutes(1),
    ]
}

/// Labels to search for, in probe order
pub fn probe_labels(trigger: DateTime<Utc>, tz: Tz) -> Vec<String> {
    probe_times(trigger)
        .into_iter()
        .map(|t| link_label(t, tz))
        .collect()
}
