// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{Days, NaiveDate, NaiveDateTime, Utc};

/// Half-open bounds `[day 00:00, day+1 00:00)` of a calendar day.
pub fn day_bounds(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(chrono::NaiveTime::MIN);
    // Only NaiveDate::MAX has no successor.
    let end = day
        .checked_add_days(Days::new(1))
        .map(|next| next.and_time(chrono::NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}

/// Today's date in UTC, which is the calendar the server buckets by.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Current wall-clock time as a naive UTC timestamp.
pub fn now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds_are_half_open_midnights() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let (start, end) = day_bounds(day);

        assert_eq!(start.to_string(), "2024-02-29 00:00:00");
        assert_eq!(end.to_string(), "2024-03-01 00:00:00");
    }
}
