//! Wire types shared with the study service.
//!
//! Topics, sessions and evolution payloads are owned by the service; the
//! client only reads them. Companion fields travel flat on the topic record
//! (`pokemon_id`, `pokemon_level`, ...) and are regrouped by
//! [`Topic::companion`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TopicId = i64;
pub type SessionId = i64;

/// Progress status of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    #[default]
    NotStarted,
    InProgress,
    #[serde(alias = "done")]
    Completed,
}

impl TopicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicStatus::NotStarted => "not_started",
            TopicStatus::InProgress => "in_progress",
            TopicStatus::Completed => "completed",
        }
    }
}

/// A user-defined study area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TopicStatus,
    #[serde(default)]
    pub minutes_spent: u64,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pokemon_id: Option<i64>,
    #[serde(default)]
    pub pokemon_name: Option<String>,
    #[serde(default)]
    pub pokemon_sprite: Option<String>,
    #[serde(default)]
    pub pokemon_level: Option<u32>,
    #[serde(default)]
    pub pokemon_exp: Option<u64>,
}

/// The creature paired with a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Companion {
    pub creature_id: i64,
    pub name: String,
    pub sprite: Option<String>,
    pub level: u32,
    pub exp: u64,
}

impl Topic {
    /// Regroups the flat companion fields. `None` when no creature is assigned.
    pub fn companion(&self) -> Option<Companion> {
        let creature_id = self.pokemon_id?;
        Some(Companion {
            creature_id,
            name: self.pokemon_name.clone().unwrap_or_default(),
            sprite: self.pokemon_sprite.clone(),
            level: self.pokemon_level.unwrap_or(1).max(1),
            exp: self.pokemon_exp.unwrap_or(0),
        })
    }
}

/// One timed study interval against a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub topic_id: TopicId,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: u64,
}

impl Session {
    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Payload attached to an end-session response when the companion evolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionEvent {
    pub from_id: i64,
    pub from_name: String,
    pub to_id: i64,
    pub to_name: String,
    pub at_level: u32,
}

/// Response to `POST /sessions/{id}/end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEnded {
    #[serde(flatten)]
    pub session: Session,
    #[serde(default)]
    pub evolution: Option<EvolutionEvent>,
}

/// Service timestamps: RFC 3339, or naive ISO 8601 which is taken as UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_some(&dt.to_rfc3339()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => parse(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid timestamp: {raw}"))
                }),
                None => Ok(None),
            }
        }
    }
}
