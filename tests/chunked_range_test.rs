//! Window coverage of chunked date ranges

use booker_export::core::export::ChunkedRange;
use chrono::{Duration, NaiveDate};
use test_case::test_case;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test_case(date(2024, 1, 1), date(2024, 1, 25), 11, 3; "three windows over january")]
#[test_case(date(2024, 1, 1), date(2024, 1, 1), 11, 1; "single day")]
#[test_case(date(2024, 1, 1), date(2024, 1, 11), 11, 1; "exact window")]
#[test_case(date(2024, 1, 1), date(2024, 1, 12), 11, 2; "one day over")]
#[test_case(date(2024, 2, 20), date(2024, 3, 5), 7, 3; "across leap day")]
#[test_case(date(2023, 12, 25), date(2024, 1, 10), 1, 17; "daily windows across new year")]
#[test_case(date(2024, 1, 1), date(2024, 12, 31), 30, 13; "whole year")]
fn test_windows_tile_the_range(start: NaiveDate, end: NaiveDate, days: u32, expected: usize) {
    let windows: Vec<_> = ChunkedRange::new(start, end, days).collect();

    assert_eq!(windows.len(), expected);
    assert_eq!(windows[0].start(), start);

    for window in &windows {
        assert_eq!(window.days(), i64::from(days));
        assert!(window.start() <= end);
    }
    for pair in windows.windows(2) {
        assert_eq!(pair[1].start(), pair[0].end() + Duration::days(1));
    }

    let last = windows.last().unwrap();
    assert!(last.end() >= end);
    assert!(last.end() - end < Duration::days(i64::from(days)));
}

#[test]
fn test_inverted_range_is_empty() {
    assert_eq!(
        ChunkedRange::with_default_window(date(2024, 2, 1), date(2024, 1, 1)).count(),
        0
    );
}

#[test]
fn test_size_hint_matches_count() {
    let range = ChunkedRange::new(date(2024, 1, 1), date(2024, 3, 31), 11);
    let (lower, upper) = range.size_hint();
    let count = range.count();
    assert_eq!(lower, count);
    assert_eq!(upper, Some(count));
}
