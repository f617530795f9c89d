//! Snapping instants to the boundaries of their calendar day.
//!
//! "End of day" is the last representable microsecond, 23:59:59.999999,
//! in the instant's own offset.

use chrono::{DateTime, NaiveTime, TimeZone};

/// Last microsecond of a calendar day.
pub fn last_time_of_day() -> NaiveTime {
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN)
}

/// `dt` with its time of day replaced by 23:59:59.999999, same calendar day.
pub fn end_of_day<Tz: TimeZone>(dt: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    dt.timezone()
        .from_local_datetime(&dt.date_naive().and_time(last_time_of_day()))
        .latest()
}

/// `dt` with its time of day replaced by midnight, same calendar day.
pub fn start_of_day<Tz: TimeZone>(dt: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    dt.timezone()
        .from_local_datetime(&dt.date_naive().and_time(NaiveTime::MIN))
        .earliest()
}
