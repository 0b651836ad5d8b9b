//! Per-topic study time.
//!
//! Sessions are grouped by topic id, summed and counted, joined against the
//! topic list for titles, and sorted by total minutes descending. Equal
//! totals keep ascending topic id order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Session, Topic, TopicId};

/// Title used when a session's topic has been deleted.
pub const UNKNOWN_TOPIC: &str = "Unknown";

/// Aggregated study time for one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTotal {
    pub topic_id: TopicId,
    pub topic_name: String,
    pub minutes: u64,
    pub session_count: u32,
}

impl TopicTotal {
    /// Bar width relative to the busiest topic, 0.0 to 100.0
    pub fn share_of_max(&self, max_minutes: u64) -> f64 {
        self.minutes as f64 / max_minutes.max(1) as f64 * 100.0
    }
}

/// Group sessions by topic and sort by total minutes, most studied first.
pub fn topic_totals(sessions: &[Session], topics: &[Topic]) -> Vec<TopicTotal> {
    let mut grouped: BTreeMap<TopicId, (u64, u32)> = BTreeMap::new();
    for session in sessions {
        let entry = grouped.entry(session.topic_id).or_insert((0, 0));
        entry.0 += session.duration_minutes;
        entry.1 += 1;
    }

    let mut totals: Vec<TopicTotal> = grouped
        .into_iter()
        .map(|(topic_id, (minutes, session_count))| TopicTotal {
            topic_id,
            topic_name: topics
                .iter()
                .find(|t| t.id == topic_id)
                .map(|t| t.title.clone())
                .unwrap_or_else(|| UNKNOWN_TOPIC.to_string()),
            minutes,
            session_count,
        })
        .collect();

    // sort_by is stable
    totals.sort_by(|a, b| b.minutes.cmp(&a.minutes));
    totals
}

/// Head of the sorted totals, or `None` without sessions.
pub fn most_studied(totals: &[TopicTotal]) -> Option<&TopicTotal> {
    totals.first()
}

/// Largest per-topic total, at least 1 so it can divide.
pub fn max_topic_minutes(totals: &[TopicTotal]) -> u64 {
    totals.iter().map(|t| t.minutes).max().unwrap_or(0).max(1)
}
