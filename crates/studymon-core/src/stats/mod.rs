//! Statistics module for Studymon
//!
//! Pure transforms over a session/topic snapshot fetched from the study
//! service: per-topic totals, the seven-day series, and aggregate totals.
//! Nothing here is cached; every call recomputes from its inputs.

mod daily;
mod report;
mod topic_totals;

pub use daily::{last_seven_days, max_day_minutes, DayBucket, SERIES_DAYS};

pub use report::{average_session_minutes, format_minutes, total_minutes, StudyReport};

pub use topic_totals::{
    max_topic_minutes, most_studied, topic_totals, TopicTotal, UNKNOWN_TOPIC,
};
