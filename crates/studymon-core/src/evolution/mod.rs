mod slot;
mod timeline;

pub use slot::AnnouncementSlot;
pub use timeline::{sprite_url, EvolutionStage, EvolutionTimeline, TimelineSchedule};
