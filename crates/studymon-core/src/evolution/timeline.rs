//! Staged evolution announcement.
//!
//! ```text
//! offset (units)  0         1          3            6        6 + fade
//!                 |Initial  |Evolving  |Complete    |Dismissing|Finished
//! ```
//!
//! The user may dismiss at any point; dismissal jumps straight to
//! `Dismissing`, no later stage fires, and `Finished` follows after the
//! fade-out grace. Like the study timer, the timeline has no threads: the
//! caller polls it and receives the transitions that happened since the
//! previous poll.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::events::Event;
use crate::model::EvolutionEvent;

/// Sprite artwork for a creature id.
pub fn sprite_url(creature_id: i64) -> String {
    format!(
        "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{creature_id}.png"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvolutionStage {
    /// Pre-evolution creature on screen.
    Initial,
    /// Transitional animation.
    Evolving,
    /// Post-evolution creature and summary.
    Complete,
    /// Fade-out grace after dismissal.
    Dismissing,
    /// Gone. The completion callback has run.
    Finished,
}

impl EvolutionStage {
    pub fn headline(&self) -> &'static str {
        match self {
            EvolutionStage::Initial => "What's happening?!",
            EvolutionStage::Evolving => "EVOLVING!",
            EvolutionStage::Complete => "Congratulations!",
            EvolutionStage::Dismissing | EvolutionStage::Finished => "",
        }
    }
}

impl fmt::Display for EvolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EvolutionStage::Initial => "initial",
            EvolutionStage::Evolving => "evolving",
            EvolutionStage::Complete => "complete",
            EvolutionStage::Dismissing => "dismissing",
            EvolutionStage::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// Stage offsets are expressed in `unit`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineSchedule {
    pub unit: Duration,
    pub fade_out: Duration,
}

impl TimelineSchedule {
    pub const EVOLVING_AT: u32 = 1;
    pub const COMPLETE_AT: u32 = 3;
    pub const AUTO_DISMISS_AT: u32 = 6;

    pub fn new(unit: Duration, fade_out: Duration) -> Self {
        Self { unit, fade_out }
    }

    fn offset_ms(&self, units: u32) -> u64 {
        saturating_ms(self.unit.saturating_mul(units))
    }

    fn fade_ms(&self) -> u64 {
        saturating_ms(self.fade_out)
    }
}

fn saturating_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Default for TimelineSchedule {
    fn default() -> Self {
        Self {
            unit: Duration::from_secs(1),
            fade_out: Duration::from_millis(500),
        }
    }
}

type OnClose = Box<dyn FnOnce() + Send>;

/// One evolution announcement from trigger to fade-out.
pub struct EvolutionTimeline {
    event: EvolutionEvent,
    schedule: TimelineSchedule,
    clock: Arc<dyn Clock>,
    started_ms: u64,
    dismissed_ms: Option<u64>,
    /// Last stage handed out by `poll`.
    reported: EvolutionStage,
    cancelled: bool,
    on_close: Option<OnClose>,
}

impl fmt::Debug for EvolutionTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvolutionTimeline")
            .field("event", &self.event)
            .field("schedule", &self.schedule)
            .field("started_ms", &self.started_ms)
            .field("dismissed_ms", &self.dismissed_ms)
            .field("reported", &self.reported)
            .field("cancelled", &self.cancelled)
            .finish()
    }
}

impl EvolutionTimeline {
    /// Trigger the announcement now. The `Initial` stage is shown immediately.
    pub fn start(event: EvolutionEvent, schedule: TimelineSchedule, clock: Arc<dyn Clock>) -> Self {
        let started_ms = clock.now_ms();
        tracing::info!(from = %event.from_name, to = %event.to_name, "evolution announcement started");
        Self {
            event,
            schedule,
            clock,
            started_ms,
            dismissed_ms: None,
            reported: EvolutionStage::Initial,
            cancelled: false,
            on_close: None,
        }
    }

    /// Run `f` once, when the fade-out after dismissal has finished.
    pub fn on_close(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn event(&self) -> &EvolutionEvent {
        &self.event
    }

    /// Stage at the current clock reading.
    pub fn stage(&self) -> EvolutionStage {
        if self.cancelled {
            return EvolutionStage::Finished;
        }
        self.stage_at(self.clock.now_ms())
    }

    pub fn is_finished(&self) -> bool {
        self.stage() == EvolutionStage::Finished
    }

    /// Creature to draw for the current stage: the old form, nothing while
    /// evolving, then the new form.
    pub fn visible_creature(&self) -> Option<(i64, &str)> {
        match self.stage() {
            EvolutionStage::Initial => Some((self.event.from_id, &self.event.from_name)),
            EvolutionStage::Complete => Some((self.event.to_id, &self.event.to_name)),
            _ => None,
        }
    }

    /// Summary lines shown with the `Complete` stage.
    pub fn summary(&self) -> [String; 2] {
        [
            format!(
                "{} evolved into {}!",
                self.event.from_name, self.event.to_name
            ),
            format!("At Level {}", self.event.at_level),
        ]
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Explicit dismissal ("Continue"). Idempotent; no-op once the
    /// auto-dismiss point has passed.
    pub fn dismiss(&mut self) -> bool {
        if self.cancelled || self.dismissed_ms.is_some() {
            return false;
        }
        let now = self.clock.now_ms();
        if now >= self.auto_dismiss_ms() {
            return false;
        }
        self.dismissed_ms = Some(now);
        tracing::debug!("evolution announcement dismissed");
        true
    }

    /// Drop every pending stage without running the completion callback.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.on_close = None;
    }

    /// Transitions since the previous poll, oldest first.
    pub fn poll(&mut self) -> Vec<Event> {
        if self.cancelled || self.reported == EvolutionStage::Finished {
            return Vec::new();
        }
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        for (stage, at_ms) in self.transitions() {
            if stage <= self.reported || at_ms > now {
                continue;
            }
            self.reported = stage;
            let at = chrono::DateTime::from_timestamp_millis(at_ms as i64).unwrap_or_default();
            if stage == EvolutionStage::Finished {
                events.push(Event::EvolutionFinished { at });
                if let Some(on_close) = self.on_close.take() {
                    on_close();
                }
            } else {
                events.push(Event::EvolutionStageChanged { stage, at });
            }
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn auto_dismiss_ms(&self) -> u64 {
        self.started_ms
            .saturating_add(self.schedule.offset_ms(TimelineSchedule::AUTO_DISMISS_AT))
    }

    fn dismissal_ms(&self) -> u64 {
        let auto = self.auto_dismiss_ms();
        self.dismissed_ms.map_or(auto, |t| t.min(auto))
    }

    /// Every stage that will actually be shown, with its start time.
    fn transitions(&self) -> Vec<(EvolutionStage, u64)> {
        let dismiss = self.dismissal_ms();
        let mut out = vec![(EvolutionStage::Initial, self.started_ms)];
        for (stage, units) in [
            (EvolutionStage::Evolving, TimelineSchedule::EVOLVING_AT),
            (EvolutionStage::Complete, TimelineSchedule::COMPLETE_AT),
        ] {
            let at = self.started_ms.saturating_add(self.schedule.offset_ms(units));
            if at < dismiss {
                out.push((stage, at));
            }
        }
        out.push((EvolutionStage::Dismissing, dismiss));
        out.push((
            EvolutionStage::Finished,
            dismiss.saturating_add(self.schedule.fade_ms()),
        ));
        out
    }

    fn stage_at(&self, now: u64) -> EvolutionStage {
        self.transitions()
            .into_iter()
            .take_while(|(_, at)| *at <= now)
            .last()
            .map(|(stage, _)| stage)
            .unwrap_or(EvolutionStage::Initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn charmander() -> EvolutionEvent {
        EvolutionEvent {
            from_id: 4,
            from_name: "Charmander".into(),
            to_id: 5,
            to_name: "Charmeleon".into(),
            at_level: 16,
        }
    }

    fn timeline(clock: &ManualClock) -> EvolutionTimeline {
        EvolutionTimeline::start(charmander(), TimelineSchedule::default(), Arc::new(clock.clone()))
    }

    fn stages(events: &[Event]) -> Vec<EvolutionStage> {
        events
            .iter()
            .map(|e| match e {
                Event::EvolutionStageChanged { stage, .. } => *stage,
                Event::EvolutionFinished { .. } => EvolutionStage::Finished,
                other => panic!("unexpected event {other:?}"),
            })
            .collect()
    }

    #[test]
    fn stages_follow_fixed_offsets() {
        let clock = ManualClock::starting_at(10_000);
        let tl = timeline(&clock);

        assert_eq!(tl.stage(), EvolutionStage::Initial);
        clock.advance(Duration::from_millis(999));
        assert_eq!(tl.stage(), EvolutionStage::Initial);
        clock.advance(Duration::from_millis(1));
        assert_eq!(tl.stage(), EvolutionStage::Evolving);
        clock.advance(Duration::from_millis(1_999));
        assert_eq!(tl.stage(), EvolutionStage::Evolving);
        clock.advance(Duration::from_millis(1));
        assert_eq!(tl.stage(), EvolutionStage::Complete);
        clock.advance(Duration::from_millis(2_999));
        assert_eq!(tl.stage(), EvolutionStage::Complete);
        clock.advance(Duration::from_millis(1));
        assert_eq!(tl.stage(), EvolutionStage::Dismissing);
        clock.advance(Duration::from_millis(500));
        assert_eq!(tl.stage(), EvolutionStage::Finished);
    }

    #[test]
    fn poll_reports_each_transition_once_in_order() {
        let clock = ManualClock::new();
        let mut tl = timeline(&clock);

        assert!(tl.poll().is_empty());
        clock.advance_secs(4);
        assert_eq!(
            stages(&tl.poll()),
            vec![EvolutionStage::Evolving, EvolutionStage::Complete]
        );
        assert!(tl.poll().is_empty());
        clock.advance_secs(10);
        assert_eq!(
            stages(&tl.poll()),
            vec![EvolutionStage::Dismissing, EvolutionStage::Finished]
        );
        assert!(tl.poll().is_empty());
    }

    #[test]
    fn dismissal_cancels_pending_stages() {
        let clock = ManualClock::new();
        let mut tl = timeline(&clock);
        clock.advance(Duration::from_millis(500));
        assert!(tl.dismiss());
        assert!(!tl.dismiss());
        assert_eq!(tl.stage(), EvolutionStage::Dismissing);

        clock.advance_secs(10);
        assert_eq!(
            stages(&tl.poll()),
            vec![EvolutionStage::Dismissing, EvolutionStage::Finished]
        );
    }

    #[test]
    fn completion_callback_runs_once_after_fade() {
        let clock = ManualClock::new();
        let closed = Arc::new(AtomicUsize::new(0));
        let counter = closed.clone();
        let mut tl = timeline(&clock).on_close(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        clock.advance_secs(3);
        tl.dismiss();
        clock.advance(Duration::from_millis(499));
        tl.poll();
        assert_eq!(closed.load(Ordering::SeqCst), 0);
        clock.advance(Duration::from_millis(1));
        tl.poll();
        tl.poll();
        assert_eq!(closed.load(Ordering::SeqCst), 1);
        assert!(tl.is_finished());
    }

    #[test]
    fn dismiss_after_auto_dismiss_is_noop() {
        let clock = ManualClock::new();
        let mut tl = timeline(&clock);
        clock.advance_secs(6);
        assert!(!tl.dismiss());
        assert_eq!(tl.stage(), EvolutionStage::Dismissing);
    }

    #[test]
    fn oversized_schedule_saturates() {
        let clock = ManualClock::starting_at(1_700_000_000_000);
        let schedule = TimelineSchedule::new(Duration::from_millis(u64::MAX), Duration::MAX);
        let mut tl = EvolutionTimeline::start(charmander(), schedule, Arc::new(clock.clone()));

        clock.advance_secs(365 * 24 * 3600);
        assert_eq!(tl.stage(), EvolutionStage::Initial);
        assert!(tl.poll().is_empty());

        assert!(tl.dismiss());
        assert_eq!(stages(&tl.poll()), vec![EvolutionStage::Dismissing]);
        assert!(!tl.is_finished());
    }

    #[test]
    fn cancel_silences_everything() {
        let clock = ManualClock::new();
        let closed = Arc::new(AtomicUsize::new(0));
        let counter = closed.clone();
        let mut tl = timeline(&clock).on_close(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tl.cancel();
        clock.advance_secs(60);
        assert!(tl.poll().is_empty());
        assert_eq!(closed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn visible_creature_and_summary() {
        let clock = ManualClock::new();
        let tl = timeline(&clock);
        assert_eq!(tl.visible_creature(), Some((4, "Charmander")));
        clock.advance_secs(2);
        assert_eq!(tl.visible_creature(), None);
        clock.advance_secs(1);
        assert_eq!(tl.visible_creature(), Some((5, "Charmeleon")));
        assert_eq!(tl.summary()[0], "Charmander evolved into Charmeleon!");
        assert_eq!(tl.summary()[1], "At Level 16");
        assert!(sprite_url(5).ends_with("/pokemon/5.png"));
    }

    #[test]
    fn custom_unit_scales_offsets() {
        let clock = ManualClock::new();
        let schedule = TimelineSchedule::new(Duration::from_millis(100), Duration::from_millis(50));
        let tl = EvolutionTimeline::start(charmander(), schedule, Arc::new(clock.clone()));
        clock.advance(Duration::from_millis(300));
        assert_eq!(tl.stage(), EvolutionStage::Complete);
        clock.advance(Duration::from_millis(350));
        assert_eq!(tl.stage(), EvolutionStage::Finished);
    }
}
