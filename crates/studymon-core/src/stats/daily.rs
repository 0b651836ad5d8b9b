//! Fixed seven-day study time series
//!
//! Buckets cover `today - 6 ..= today` in a caller-supplied time zone.
//! Session start times are truncated to their calendar day in that zone;
//! sessions outside the window are left out of the series.

use chrono::{Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::model::Session;

/// Number of buckets in the series.
pub const SERIES_DAYS: u64 = 7;

/// Minutes studied on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Short axis label, e.g. `Mar 1`
    pub label: String,
    pub minutes: u64,
}

/// Seven buckets ending at `today`, oldest first.
pub fn last_seven_days<Tz: TimeZone>(sessions: &[Session], today: NaiveDate, tz: &Tz) -> Vec<DayBucket> {
    let mut buckets: Vec<DayBucket> = (0..SERIES_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| DayBucket {
            date,
            label: date.format("%b %-d").to_string(),
            minutes: 0,
        })
        .collect();

    let Some(oldest) = buckets.first().map(|b| b.date) else {
        return buckets;
    };

    for session in sessions {
        let day = session.start_time.with_timezone(tz).date_naive();
        if day < oldest || day > today {
            continue;
        }
        if let Some(bucket) = buckets.iter_mut().find(|b| b.date == day) {
            bucket.minutes += session.duration_minutes;
        }
    }

    buckets
}

/// Chart scale: the busiest day, at least 1.
pub fn max_day_minutes(buckets: &[DayBucket]) -> u64 {
    buckets.iter().map(|b| b.minutes).max().unwrap_or(0).max(1)
}
