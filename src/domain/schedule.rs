//! Weekly investment schedule generation.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Every `weekday` from `start` through `end`, inclusive.
///
/// The first date is `start` itself when it already falls on `weekday`,
/// otherwise the next such day. Returns an empty schedule when no matching
/// day lies within the range.
pub fn generate(start: NaiveDate, end: NaiveDate, weekday: Weekday) -> Vec<NaiveDate> {
    let offset = (weekday.num_days_from_monday() + 7 - start.weekday().num_days_from_monday()) % 7;

    let mut dates = Vec::new();
    // Stepping past the last representable date ends the schedule.
    let mut next = start.checked_add_signed(Duration::days(i64::from(offset)));
    while let Some(current) = next.filter(|d| *d <= end) {
        dates.push(current);
        next = current.checked_add_signed(Duration::weeks(1));
    }
    dates
}

/// Parse a weekday name from configuration ("thursday", "Thu", ...).
pub fn parse_weekday(value: &str) -> Option<Weekday> {
    value.trim().parse::<Weekday>().ok()
}
