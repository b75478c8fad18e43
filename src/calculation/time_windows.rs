//! Time-window overlap functionality.
//!
//! This module measures how much of a worked interval falls inside the
//! evening, night and weekend windows. Daily windows are decomposed per
//! calendar day the interval touches, so an overnight shift picks up the
//! evening of its first day and the night of its second.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// A window that repeats every calendar day, as minute offsets from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    /// Minutes after midnight at which the window opens.
    pub start_minute: i64,
    /// Minutes after midnight at which the window closes (exclusive).
    pub end_minute: i64,
}

impl DailyWindow {
    fn on(self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let midnight = date.and_time(NaiveTime::MIN);
        (
            midnight + Duration::minutes(self.start_minute),
            midnight + Duration::minutes(self.end_minute),
        )
    }
}

/// The evening window, 16:00 to 24:00.
pub const EVENING_WINDOW: DailyWindow = DailyWindow {
    start_minute: 16 * 60,
    end_minute: 24 * 60,
};

/// The night window, 00:00 to 07:30.
pub const NIGHT_WINDOW: DailyWindow = DailyWindow {
    start_minute: 0,
    end_minute: 7 * 60 + 30,
};

/// Friday 16:00, as minutes from Friday midnight.
const WEEKEND_OPENS_MINUTE: i64 = 16 * 60;
/// Sunday 07:30, as minutes from Friday midnight.
const WEEKEND_CLOSES_MINUTE: i64 = 2 * 24 * 60 + 7 * 60 + 30;
/// Days searched on each side of an interval for weekend windows.
const WEEKEND_SEARCH_MARGIN_DAYS: i64 = 3;

/// Whole minutes shared by `[a_start, a_end)` and `[b_start, b_end)`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::overlap_minutes;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let at = |h, m| day.and_hms_opt(h, m, 0).unwrap();
///
/// assert_eq!(overlap_minutes(at(9, 0), at(17, 0), at(16, 0), at(23, 0)), 60);
/// assert_eq!(overlap_minutes(at(9, 0), at(12, 0), at(16, 0), at(23, 0)), 0);
/// ```
pub fn overlap_minutes(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> i64 {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end <= start {
        return 0;
    }
    (end - start).num_minutes()
}

/// Calendar days whose midnight-to-midnight span intersects `[start, end)`.
fn days_touched(start: NaiveDateTime, end: NaiveDateTime) -> impl Iterator<Item = NaiveDate> {
    start
        .date()
        .iter_days()
        .take_while(move |day| day.and_time(NaiveTime::MIN) < end)
}

/// Minutes of `[start, end)` inside a daily window, summed over every day touched.
pub fn window_minutes(start: NaiveDateTime, end: NaiveDateTime, window: DailyWindow) -> i64 {
    days_touched(start, end)
        .map(|day| {
            let (open, close) = window.on(day);
            overlap_minutes(start, end, open, close)
        })
        .sum()
}

/// Minutes between 16:00 and 24:00.
pub fn evening_minutes(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    window_minutes(start, end, EVENING_WINDOW)
}

/// Minutes between 00:00 and 07:30.
pub fn night_minutes(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    window_minutes(start, end, NIGHT_WINDOW)
}

/// Minutes between Friday 16:00 and Sunday 07:30.
///
/// Every Friday within a three-day margin of the interval contributes its
/// window, so intervals that start on Saturday or Sunday morning still find
/// the window opened the previous Friday.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::weekend_minutes;
/// use chrono::NaiveDate;
///
/// // Friday 2026-01-16, 14:00 to 18:00
/// let friday = NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();
/// let start = friday.and_hms_opt(14, 0, 0).unwrap();
/// let end = friday.and_hms_opt(18, 0, 0).unwrap();
/// assert_eq!(weekend_minutes(start, end), 120);
/// ```
pub fn weekend_minutes(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let first = (start - Duration::days(WEEKEND_SEARCH_MARGIN_DAYS)).date();
    let last = (end + Duration::days(WEEKEND_SEARCH_MARGIN_DAYS)).date();

    let offset_to_friday = (4 + 7 - i64::from(first.weekday().num_days_from_monday())) % 7;
    let mut friday = first + Duration::days(offset_to_friday);
    let mut total = 0;
    while friday <= last {
        let midnight = friday.and_time(NaiveTime::MIN);
        total += overlap_minutes(
            start,
            end,
            midnight + Duration::minutes(WEEKEND_OPENS_MINUTE),
            midnight + Duration::minutes(WEEKEND_CLOSES_MINUTE),
        );
        friday += Duration::days(7);
    }
    total
}
