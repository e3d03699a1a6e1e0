//! Business-day interval arithmetic.
//!
//! All phase durations in the dashboard are expressed in fractional
//! weekdays. Weekend time never counts, and partial boundary days count
//! only when the boundary day itself is a weekday.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

const SECONDS_PER_DAY: f64 = 86_400.0;

fn is_weekday(date: NaiveDate) -> bool {
    // Monday = 1 .. Sunday = 7
    date.weekday().number_from_monday() <= 5
}

fn seconds_between(a: chrono::NaiveDateTime, b: chrono::NaiveDateTime) -> f64 {
    (b - a).num_milliseconds() as f64 / 1_000.0
}

/// Fractional business days elapsed between two timestamps.
///
/// Returns 0 when `start >= end`. A span inside a single calendar day
/// yields the exact fraction of that day when it is a weekday, 0
/// otherwise. Multi-day spans count weekdays in `[start.date, end.date)`
/// and then trade counted boundary days for their weekday-gated partial
/// fractions. Boundary accounting intentionally matches the historical
/// dashboard: a `Fri 00:00 -> Mon 00:00` span yields 0.
pub fn business_days<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> f64 {
    if start >= end {
        return 0.0;
    }

    let start_date = start.date_naive();
    let end_date = end.date_naive();

    let mut full_days: i64 = 0;
    let mut day = start_date;
    while day < end_date {
        if is_weekday(day) {
            full_days += 1;
        }
        day += Duration::days(1);
    }

    if full_days == 0 {
        // Span within a single day, or only weekend days.
        if is_weekday(start_date) {
            let total = seconds_between(start.naive_local(), end.naive_local());
            return total / SECONDS_PER_DAY;
        }
        return 0.0;
    }

    let mut start_partial = 0.0;
    if is_weekday(start_date) {
        let next_midnight = (start_date + Duration::days(1)).and_time(chrono::NaiveTime::MIN);
        start_partial = seconds_between(start.naive_local(), next_midnight) / SECONDS_PER_DAY;
        full_days -= 1;
    }

    let mut end_partial = 0.0;
    if is_weekday(end_date) {
        let midnight = end_date.and_time(chrono::NaiveTime::MIN);
        end_partial = seconds_between(midnight, end.naive_local()) / SECONDS_PER_DAY;
        full_days -= 1;
    }

    (full_days as f64 + start_partial + end_partial).max(0.0)
}
