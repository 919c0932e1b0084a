//! Splitting long date ranges into export windows

use crate::domain::ExportWindow;
use chrono::{Duration, NaiveDate};

/// Default window size in days
pub const DEFAULT_WINDOW_DAYS: u32 = 11;

/// Lazy sequence of consecutive windows covering `[start, end]`
///
/// Each window spans `window_days` days. The last window may extend past
/// `end`; Booker accepts future dates and simply returns fewer rows.
#[derive(Debug, Clone)]
pub struct ChunkedRange {
    next_start: NaiveDate,
    end: NaiveDate,
    window_days: u32,
}

impl ChunkedRange {
    /// Creates the iterator; a zero window size is treated as one day
    pub fn new(start: NaiveDate, end: NaiveDate, window_days: u32) -> Self {
        Self {
            next_start: start,
            end,
            window_days: window_days.max(1),
        }
    }

    pub fn with_default_window(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(start, end, DEFAULT_WINDOW_DAYS)
    }
}

impl Iterator for ChunkedRange {
    type Item = ExportWindow;

    fn next(&mut self) -> Option<ExportWindow> {
        if self.next_start > self.end {
            return None;
        }
        let start = self.next_start;
        let window_end = start + Duration::days(i64::from(self.window_days) - 1);
        self.next_start = start + Duration::days(i64::from(self.window_days));
        ExportWindow::new(start, window_end).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.next_start > self.end {
            return (0, Some(0));
        }
        let days = (self.end - self.next_start).num_days() as usize + 1;
        let n = days.div_ceil(self.window_days as usize);
        (n, Some(n))
    }
}
