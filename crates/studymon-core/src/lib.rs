//! # Studymon Core Library
//!
//! This library provides the core logic for Studymon, a study tracker where
//! timed study sessions feed experience into a companion creature attached
//! to each subject. Persistence, experience awards and evolution
//! eligibility belong to the study service; this crate owns the client side.
//!
//! ## Architecture
//!
//! - **Study Timer**: A wall-clock-based state machine bound to one service
//!   session; the caller periodically invokes `tick()`
//! - **Leveling**: The single copy of the cubic experience curve used by
//!   every progress display
//! - **Evolution**: Staged announcement timeline with a single-flight slot
//! - **Statistics**: Per-topic totals, seven-day series and aggregate totals
//! - **Service**: Trait for the study service plus its HTTP client
//!
//! ## Key Components
//!
//! - [`StudyTimer`]: Core timer state machine
//! - [`EvolutionTimeline`]: Evolution announcement stages
//! - [`StudyReport`]: Statistics derived from a snapshot
//! - [`StudyService`]: Trait for the external study service
//! - [`Config`]: Application configuration management

pub mod ace;
pub mod clock;
pub mod error;
pub mod events;
pub mod evolution;
pub mod leveling;
pub mod model;
pub mod service;
pub mod snapshot;
pub mod stats;
pub mod storage;
pub mod timer;

pub use ace::{ace_progress, select_ace, AceProgress};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AnnouncementError, ConfigError, CoreError, ServiceError, TimerError};
pub use events::Event;
pub use evolution::{AnnouncementSlot, EvolutionStage, EvolutionTimeline, TimelineSchedule};
pub use model::{Companion, EvolutionEvent, Session, SessionEnded, Topic, TopicStatus};
pub use service::{HttpStudyService, StudyService};
pub use snapshot::StudySnapshot;
pub use stats::{DayBucket, StudyReport, TopicTotal};
pub use storage::Config;
pub use timer::{Controls, StopOutcome, StudyTimer, TimerSnapshot, TimerState};
