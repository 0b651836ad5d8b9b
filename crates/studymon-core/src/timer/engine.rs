//! Study timer implementation.
//!
//! The study timer is a wall-clock-based stopwatch bound to one service
//! session. It does not use internal threads - the caller is responsible
//! for calling `tick()` periodically (once a second is enough; a late tick
//! never loses time because every flush measures the real delta).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Starting -> Running <-> Paused
//!            |           \         /
//!            v            Stopping -> Idle
//!          Idle        (on failure: back to Running | Paused)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = StudyTimer::new(service, Arc::new(SystemClock));
//! timer.select_topic(Some(topic_id))?;
//! timer.start().await?;
//! // In a loop:
//! timer.tick();
//! let outcome = timer.stop().await?;
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::clock::Clock;
use crate::error::TimerError;
use crate::events::Event;
use crate::model::{EvolutionEvent, Session, SessionId, TopicId};
use crate::service::StudyService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    /// Begin-session request in flight.
    Starting,
    Running,
    Paused,
    /// End-session request in flight. The counter is frozen.
    Stopping,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Starting => "starting",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Stopping => "stopping",
        }
    }

    /// Whether a service session is bound to the timer.
    pub fn has_session(&self) -> bool {
        matches!(
            self,
            TimerState::Running | TimerState::Paused | TimerState::Stopping
        )
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which controls a presentation layer may offer right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Controls {
    pub select: bool,
    pub start: bool,
    pub pause: bool,
    pub resume: bool,
    pub stop: bool,
}

impl Controls {
    pub fn for_state(state: TimerState) -> Self {
        match state {
            TimerState::Idle => Controls {
                select: true,
                start: true,
                ..Default::default()
            },
            TimerState::Running => Controls {
                pause: true,
                stop: true,
                ..Default::default()
            },
            TimerState::Paused => Controls {
                resume: true,
                stop: true,
                ..Default::default()
            },
            // Re-entrancy guard: nothing is offered while a request is pending.
            TimerState::Starting | TimerState::Stopping => Controls::default(),
        }
    }
}

/// Observable timer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub topic_id: Option<TopicId>,
    pub session_id: Option<SessionId>,
    pub elapsed_secs: u64,
    pub display: String,
    pub controls: Controls,
}

/// Result of a successful stop-and-save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// Plain completion acknowledgement.
    Saved {
        session: Session,
        duration_minutes: u64,
    },
    /// The companion evolved; hand `evolution` to the announcement timeline.
    Evolved {
        session: Session,
        duration_minutes: u64,
        evolution: EvolutionEvent,
    },
}

impl StopOutcome {
    pub fn duration_minutes(&self) -> u64 {
        match self {
            StopOutcome::Saved {
                duration_minutes, ..
            }
            | StopOutcome::Evolved {
                duration_minutes, ..
            } => *duration_minutes,
        }
    }

    pub fn session(&self) -> &Session {
        match self {
            StopOutcome::Saved { session, .. } | StopOutcome::Evolved { session, .. } => session,
        }
    }

    pub fn evolution(&self) -> Option<&EvolutionEvent> {
        match self {
            StopOutcome::Evolved { evolution, .. } => Some(evolution),
            StopOutcome::Saved { .. } => None,
        }
    }

    /// Completion acknowledgement shown when nothing evolved.
    pub fn message(&self) -> String {
        format!(
            "Session saved! You studied for {} minutes.",
            self.duration_minutes()
        )
    }
}

/// Stopwatch bound to a study service session.
///
/// Owns the elapsed counter and the active session id exclusively.
pub struct StudyTimer {
    service: Arc<dyn StudyService>,
    clock: Arc<dyn Clock>,
    state: TimerState,
    topic_id: Option<TopicId>,
    session_id: Option<SessionId>,
    /// Accumulated running time in milliseconds.
    elapsed_ms: u64,
    /// Timestamp (ms) of the last flush while running.
    last_tick_ms: Option<u64>,
    snapshots: watch::Sender<TimerSnapshot>,
}

impl StudyTimer {
    /// Create an idle timer with zero elapsed time and no topic selected.
    pub fn new(service: Arc<dyn StudyService>, clock: Arc<dyn Clock>) -> Self {
        let (snapshots, _) = watch::channel(TimerSnapshot {
            state: TimerState::Idle,
            topic_id: None,
            session_id: None,
            elapsed_secs: 0,
            display: format_elapsed(0),
            controls: Controls::for_state(TimerState::Idle),
        });
        Self {
            service,
            clock,
            state: TimerState::Idle,
            topic_id: None,
            session_id: None,
            elapsed_ms: 0,
            last_tick_ms: None,
            snapshots,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn topic_id(&self) -> Option<TopicId> {
        self.topic_id
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    /// Whole seconds counted so far, including time since the last tick.
    pub fn elapsed_secs(&self) -> u64 {
        let pending = match self.last_tick_ms {
            Some(last) => self.clock.now_ms().saturating_sub(last),
            None => 0,
        };
        (self.elapsed_ms + pending) / 1000
    }

    /// Minutes that would be reported if the timer stopped now.
    pub fn duration_minutes(&self) -> u64 {
        self.elapsed_secs() / 60
    }

    /// `MM:SS` rendering of the elapsed time.
    pub fn display(&self) -> String {
        format_elapsed(self.elapsed_secs())
    }

    pub fn controls(&self) -> Controls {
        Controls::for_state(self.state)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let elapsed_secs = self.elapsed_secs();
        TimerSnapshot {
            state: self.state,
            topic_id: self.topic_id,
            session_id: self.session_id,
            elapsed_secs,
            display: format_elapsed(elapsed_secs),
            controls: self.controls(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            snapshot: self.snapshot(),
            at: self.clock.now(),
        }
    }

    /// Receive a fresh snapshot after every transition and every
    /// whole-second change.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Choose the topic for the next session. Locked while a session is active.
    pub fn select_topic(&mut self, topic_id: Option<TopicId>) -> Result<Event, TimerError> {
        if self.state != TimerState::Idle {
            return Err(TimerError::SelectionLocked { state: self.state });
        }
        self.topic_id = topic_id;
        self.publish();
        Ok(Event::TopicSelected {
            topic_id,
            at: self.clock.now(),
        })
    }

    /// Open a service session for the selected topic and start counting.
    ///
    /// On failure the timer stays idle with nothing retained.
    pub async fn start(&mut self) -> Result<Event, TimerError> {
        if self.state != TimerState::Idle {
            return Err(TimerError::InvalidTransition {
                action: "start",
                state: self.state,
            });
        }
        let topic_id = self.topic_id.ok_or(TimerError::NoTopicSelected)?;

        self.state = TimerState::Starting;
        self.publish();

        match self.service.start_session(topic_id).await {
            Ok(session) => {
                self.session_id = Some(session.id);
                self.elapsed_ms = 0;
                self.last_tick_ms = Some(self.clock.now_ms());
                self.state = TimerState::Running;
                self.publish();
                tracing::info!(session_id = session.id, topic_id, "study session started");
                Ok(Event::SessionStarted {
                    session_id: session.id,
                    topic_id,
                    at: self.clock.now(),
                })
            }
            Err(err) => {
                self.clear_session();
                tracing::warn!(topic_id, error = %err, "failed to start study session");
                Err(TimerError::StartFailed(err))
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                // Flush elapsed time first.
                self.flush_elapsed();
                self.last_tick_ms = None;
                self.state = TimerState::Paused;
                self.publish();
                Some(Event::TimerPaused {
                    elapsed_secs: self.elapsed_secs(),
                    at: self.clock.now(),
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Paused => {
                self.last_tick_ms = Some(self.clock.now_ms());
                self.state = TimerState::Running;
                self.publish();
                Some(Event::TimerResumed {
                    elapsed_secs: self.elapsed_secs(),
                    at: self.clock.now(),
                })
            }
            _ => None,
        }
    }

    /// Call periodically. Returns the elapsed whole seconds.
    pub fn tick(&mut self) -> u64 {
        if self.state != TimerState::Running {
            return self.elapsed_secs();
        }
        let before = self.elapsed_ms / 1000;
        self.flush_elapsed();
        let after = self.elapsed_ms / 1000;
        if after != before {
            self.publish();
        }
        after
    }

    /// Finalize the session with `floor(elapsed_secs / 60)` minutes.
    ///
    /// On success the timer returns to idle (the topic stays selected). On
    /// failure it returns to the state it was stopped from with its
    /// session id and elapsed time intact, so the stop can be retried.
    pub async fn stop(&mut self) -> Result<StopOutcome, TimerError> {
        let prior = self.state;
        let session_id = match (prior, self.session_id) {
            (TimerState::Running | TimerState::Paused, Some(id)) => id,
            _ => {
                return Err(TimerError::InvalidTransition {
                    action: "stop",
                    state: prior,
                })
            }
        };

        self.flush_elapsed();
        self.last_tick_ms = None;
        self.state = TimerState::Stopping;
        self.publish();

        let duration_minutes = self.elapsed_secs() / 60;

        match self.service.end_session(session_id, duration_minutes).await {
            Ok(ended) => {
                self.clear_session();
                tracing::info!(session_id, duration_minutes, "study session saved");
                Ok(match ended.evolution {
                    Some(evolution) => {
                        tracing::info!(
                            from = %evolution.from_name,
                            to = %evolution.to_name,
                            level = evolution.at_level,
                            "companion evolved"
                        );
                        StopOutcome::Evolved {
                            session: ended.session,
                            duration_minutes,
                            evolution,
                        }
                    }
                    None => StopOutcome::Saved {
                        session: ended.session,
                        duration_minutes,
                    },
                })
            }
            Err(err) => {
                self.state = prior;
                if prior == TimerState::Running {
                    self.last_tick_ms = Some(self.clock.now_ms());
                }
                self.publish();
                tracing::warn!(session_id, error = %err, "failed to save study session");
                Err(TimerError::StopFailed(err))
            }
        }
    }

    /// Tear down to idle without talking to the service.
    pub fn reset(&mut self) -> Event {
        self.clear_session();
        Event::TimerReset {
            at: self.clock.now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_elapsed(&mut self) {
        if let Some(last) = self.last_tick_ms {
            let now = self.clock.now_ms();
            self.elapsed_ms += now.saturating_sub(last);
            self.last_tick_ms = Some(now);
        }
    }

    fn clear_session(&mut self) {
        self.state = TimerState::Idle;
        self.session_id = None;
        self.elapsed_ms = 0;
        self.last_tick_ms = None;
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

/// `MM:SS`; minutes keep counting past 99.
pub fn format_elapsed(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
