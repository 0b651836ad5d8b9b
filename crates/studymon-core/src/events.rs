use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::evolution::EvolutionStage;
use crate::model::{SessionId, TopicId};
use crate::timer::TimerSnapshot;

/// Every state change in the system produces an Event.
/// The presentation layer renders them; nothing in the core reacts to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TopicSelected {
        topic_id: Option<TopicId>,
        at: DateTime<Utc>,
    },
    SessionStarted {
        session_id: SessionId,
        topic_id: TopicId,
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// Timer torn down without saving.
    TimerReset {
        at: DateTime<Utc>,
    },
    /// The evolution announcement moved to a new stage.
    EvolutionStageChanged {
        stage: EvolutionStage,
        at: DateTime<Utc>,
    },
    /// Fade-out finished; the announcement is gone.
    EvolutionFinished {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        snapshot: TimerSnapshot,
        at: DateTime<Utc>,
    },
}
