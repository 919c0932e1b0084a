//! Export windows
//!
//! Booker caps the size of a single report export, so long date ranges are
//! requested as a series of windows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used by the report date-range inputs
pub const UI_DATE_FORMAT: &str = "%m/%d/%Y";

/// Inclusive date range `[start, end]` requested by a single export
///
/// Invariant: `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ExportWindow {
    /// Creates a new window
    ///
    /// Returns `Err` if `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if end < start {
            return Err(format!(
                "Export window end {end} is before start {start}"
            ));
        }
        Ok(Self { start, end })
    }

    /// Single-day window
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// First day of the window
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, both bounds included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Value typed into a report date-range input, e.g. `01/01/2024 - 01/11/2024`
    pub fn ui_range(&self) -> String {
        format!(
            "{} - {}",
            self.start.format(UI_DATE_FORMAT),
            self.end.format(UI_DATE_FORMAT)
        )
    }
}

impl fmt::Display for ExportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_rejects_reversed_range() {
        assert!(ExportWindow::new(date(2024, 1, 2), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_window_days_inclusive() {
        let window = ExportWindow::new(date(2024, 1, 1), date(2024, 1, 11)).unwrap();
        assert_eq!(window.days(), 11);
        assert_eq!(ExportWindow::single_day(date(2024, 2, 29)).days(), 1);
    }

    #[test]
    fn test_ui_range_format() {
        let window = ExportWindow::new(date(2024, 1, 23), date(2024, 2, 2)).unwrap();
        assert_eq!(window.ui_range(), "01/23/2024 - 02/02/2024");
    }

    #[test]
    fn test_display() {
        let window = ExportWindow::new(date(2024, 1, 1), date(2024, 1, 11)).unwrap();
        assert_eq!(window.to_string(), "2024-01-01..2024-01-11");
    }
}
