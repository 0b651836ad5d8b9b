//! Aggregate totals and the full statistics report.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use super::daily::{last_seven_days, DayBucket};
use super::topic_totals::{topic_totals, TopicTotal};
use crate::model::{Session, Topic};

/// Sum of every session's duration.
pub fn total_minutes(sessions: &[Session]) -> u64 {
    sessions.iter().map(|s| s.duration_minutes).sum()
}

/// `round(total / count)`, 0 without sessions.
pub fn average_session_minutes(sessions: &[Session]) -> u64 {
    if sessions.is_empty() {
        return 0;
    }
    (total_minutes(sessions) as f64 / sessions.len() as f64).round() as u64
}

/// `45m`, `1h 5m`.
pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours == 0 {
        format!("{mins}m")
    } else {
        format!("{hours}h {mins}m")
    }
}

/// Everything the statistics view shows, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyReport {
    pub total_minutes: u64,
    pub session_count: usize,
    pub average_session_minutes: u64,
    pub most_studied: Option<TopicTotal>,
    pub by_topic: Vec<TopicTotal>,
    pub last_seven_days: Vec<DayBucket>,
}

impl StudyReport {
    /// Pure recomputation; the same inputs always give the same report.
    pub fn compute<Tz: TimeZone>(
        sessions: &[Session],
        topics: &[Topic],
        today: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let by_topic = topic_totals(sessions, topics);
        Self {
            total_minutes: total_minutes(sessions),
            session_count: sessions.len(),
            average_session_minutes: average_session_minutes(sessions),
            most_studied: by_topic.first().cloned(),
            by_topic,
            last_seven_days: last_seven_days(sessions, today, tz),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.session_count == 0
    }
}
