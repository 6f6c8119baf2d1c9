//! Calendar windows (day / week / month) in the application timezone
//!
//! Bounds are computed in a fixed UTC offset and returned as UTC instants.
//! Both ends are inclusive: `end` is one nanosecond before the next period.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// The calendar day containing `now`
    pub fn today(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let day = local_date(now, offset);
        Self::from_local_dates(day, day + Duration::days(1), offset)
    }

    /// The Monday-based week containing `now`
    pub fn this_week(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let day = local_date(now, offset);
        let monday = day - Duration::days(day.weekday().num_days_from_monday() as i64);
        Self::from_local_dates(monday, monday + Duration::days(7), offset)
    }

    /// The calendar month containing `now`
    pub fn this_month(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let day = local_date(now, offset);
        let first = day - Duration::days(day.day0() as i64);
        // 任意月份 +32 天必然落在下个月
        let past_end = first + Duration::days(32);
        let next_first = past_end - Duration::days(past_end.day0() as i64);
        Self::from_local_dates(first, next_first, offset)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    fn from_local_dates(start: NaiveDate, next_start: NaiveDate, offset: FixedOffset) -> Self {
        let start = local_midnight_to_utc(start, offset);
        let next = local_midnight_to_utc(next_start, offset);
        Self {
            start,
            end: next - Duration::nanoseconds(1),
        }
    }
}

/// `now - days`, the lower bound of a trailing window
pub fn days_ago(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now - Duration::days(days as i64)
}

fn local_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

pub(crate) fn local_midnight_to_utc(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = date.and_time(chrono::NaiveTime::MIN);
    let naive_utc = local_midnight - Duration::seconds(offset.local_minus_utc() as i64);
    Utc.from_utc_datetime(&naive_utc)
}
