//! Calendar helpers for building date-range queries. All boundaries are UTC.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::db::DateRange;

/// Midnight at the start of the day containing `at`.
#[must_use]
pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// The last millisecond (23:59:59.999) of the day containing `at`.
#[must_use]
pub fn end_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(at) + TimeDelta::days(1) - TimeDelta::milliseconds(1)
}

/// The whole day containing `at`.
#[must_use]
pub fn day_range(at: DateTime<Utc>) -> DateRange {
    DateRange {
        start: start_of_day(at),
        end: end_of_day(at),
    }
}

/// The whole calendar month containing `at`, first instant to last millisecond.
#[must_use]
pub fn month_range(at: DateTime<Utc>) -> DateRange {
    let first = NaiveDate::from_ymd_opt(at.year(), at.month(), 1).unwrap_or_else(|| at.date_naive());
    let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
    DateRange {
        start: first.and_time(NaiveTime::MIN).and_utc(),
        end: next.and_time(NaiveTime::MIN).and_utc() - TimeDelta::milliseconds(1),
    }
}

/// The month containing the current instant.
#[must_use]
pub fn current_month() -> DateRange {
    month_range(Utc::now())
}

/// Whether `at` falls on the same calendar day as `now`.
#[must_use]
pub fn is_today(at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    at.date_naive() == now.date_naive()
}

/// Whether `at` falls on the calendar day before `now`.
#[must_use]
pub fn is_yesterday(at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.date_naive()
        .checked_sub_days(Days::new(1))
        .is_some_and(|yesterday| at.date_naive() == yesterday)
}
