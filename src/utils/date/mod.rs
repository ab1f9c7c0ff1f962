// Date utility functions

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Timestamp `minutes` after midnight of `date`. 1440 lands on the next midnight.
pub fn at_minute_of_day(date: NaiveDate, minutes: i64) -> NaiveDateTime {
    start_of_day(date) + Duration::minutes(minutes)
}

/// Minutes between midnight of `day` and `at` (negative before, > 1440 after).
pub fn minutes_since_midnight(day: NaiveDate, at: NaiveDateTime) -> i64 {
    (at - start_of_day(day)).num_minutes()
}

/// Calculate the start of the week containing the given date.
///
/// # Arguments
/// * `date` - The date to find the week start for
/// * `first_day_of_week` - 0 = Sunday, 1 = Monday, etc.
pub fn get_week_start(date: NaiveDate, first_day_of_week: u8) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let offset = (weekday - first_day_of_week as i64 + 7) % 7;
    date - Duration::days(offset)
}

/// Consecutive dates shown by the grid for the week containing `anchor`.
pub fn week_dates(anchor: NaiveDate, first_day_of_week: u8, days_shown: u8) -> Vec<NaiveDate> {
    let start = get_week_start(anchor, first_day_of_week);
    (0..i64::from(days_shown))
        .map(|offset| start + Duration::days(offset))
        .collect()
}
