mod engine;

pub use engine::{format_elapsed, Controls, StopOutcome, StudyTimer, TimerSnapshot, TimerState};
