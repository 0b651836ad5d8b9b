//! Single-flight holder for evolution announcements.

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::AnnouncementError;
use crate::events::Event;
use crate::model::EvolutionEvent;

use super::timeline::{EvolutionStage, EvolutionTimeline, TimelineSchedule};

/// At most one announcement is on screen; it must finish before the next.
pub struct AnnouncementSlot {
    schedule: TimelineSchedule,
    clock: Arc<dyn Clock>,
    active: Option<EvolutionTimeline>,
}

impl AnnouncementSlot {
    pub fn new(schedule: TimelineSchedule, clock: Arc<dyn Clock>) -> Self {
        Self {
            schedule,
            clock,
            active: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.active.as_ref().is_some_and(|tl| !tl.is_finished())
    }

    pub fn current(&self) -> Option<&EvolutionTimeline> {
        self.active.as_ref()
    }

    pub fn stage(&self) -> Option<EvolutionStage> {
        self.active.as_ref().map(EvolutionTimeline::stage)
    }

    /// Start announcing `event`. Rejected while another announcement is live.
    pub fn present(&mut self, event: EvolutionEvent) -> Result<Event, AnnouncementError> {
        if self.is_busy() {
            tracing::warn!(to = %event.to_name, "evolution announcement already showing");
            return Err(AnnouncementError::Busy);
        }
        let timeline = EvolutionTimeline::start(event, self.schedule, self.clock.clone());
        self.active = Some(timeline);
        Ok(Event::EvolutionStageChanged {
            stage: EvolutionStage::Initial,
            at: self.clock.now(),
        })
    }

    pub fn dismiss(&mut self) -> bool {
        self.active.as_mut().is_some_and(EvolutionTimeline::dismiss)
    }

    /// Advance the active announcement; frees the slot once it finishes.
    pub fn poll(&mut self) -> Vec<Event> {
        let Some(timeline) = self.active.as_mut() else {
            return Vec::new();
        };
        let events = timeline.poll();
        if timeline.is_finished() {
            self.active = None;
        }
        events
    }

    /// Teardown: cancel whatever is pending and free the slot.
    pub fn clear(&mut self) {
        if let Some(mut timeline) = self.active.take() {
            timeline.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn evolution(to: &str) -> EvolutionEvent {
        EvolutionEvent {
            from_id: 7,
            from_name: "Squirtle".into(),
            to_id: 8,
            to_name: to.into(),
            at_level: 16,
        }
    }

    #[test]
    fn second_announcement_waits_for_first() {
        let clock = ManualClock::new();
        let mut slot = AnnouncementSlot::new(TimelineSchedule::default(), Arc::new(clock.clone()));

        slot.present(evolution("Wartortle")).unwrap();
        assert_eq!(slot.present(evolution("Blastoise")), Err(AnnouncementError::Busy));

        assert!(slot.dismiss());
        clock.advance_secs(1);
        let events = slot.poll();
        assert!(matches!(events.last(), Some(Event::EvolutionFinished { .. })));
        assert!(!slot.is_busy());
        assert!(slot.current().is_none());

        slot.present(evolution("Blastoise")).unwrap();
        assert_eq!(slot.stage(), Some(EvolutionStage::Initial));
    }

    #[test]
    fn clear_frees_slot_without_events() {
        let clock = ManualClock::new();
        let mut slot = AnnouncementSlot::new(TimelineSchedule::default(), Arc::new(clock.clone()));
        slot.present(evolution("Wartortle")).unwrap();
        slot.clear();
        clock.advance_secs(10);
        assert!(slot.poll().is_empty());
        assert!(!slot.is_busy());
        assert!(!slot.dismiss());
    }
}
