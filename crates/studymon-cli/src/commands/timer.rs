//! Interactive study timer.
//!
//! Ticks the core timer on an interval and reads one-letter commands from
//! stdin. Evolution announcements are polled on the same interval.

use std::io::Write;
use std::sync::Arc;

use clap::Subcommand;
use studymon_core::error::Result;
use studymon_core::leveling;
use studymon_core::{
    AnnouncementSlot, Clock, Companion, Event, EvolutionEvent, EvolutionStage, StopOutcome,
    StudyService, StudyTimer, SystemClock, TimerState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use super::{connect, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Study a topic. Reads commands from stdin: p(ause), r(esume),
    /// s(top and save), c(ontinue past an evolution), q(uit without saving)
    Run {
        /// Topic ID to study
        #[arg(long)]
        topic: i64,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Pause,
    Resume,
    Stop,
    Continue,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" => Some(Command::Pause),
        "r" | "resume" => Some(Command::Resume),
        "s" | "stop" => Some(Command::Stop),
        "c" | "continue" => Some(Command::Continue),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}

fn print_status(timer: &StudyTimer) {
    let label = match timer.state() {
        TimerState::Paused => "paused",
        _ => "studying",
    };
    print!("\r{}  {label}   ", timer.display());
    let _ = std::io::stdout().flush();
}

fn render_stage(evolution: &EvolutionEvent, summary: &[String; 2], stage: EvolutionStage) {
    match stage {
        EvolutionStage::Initial => {
            println!("\n{} {}", stage.headline(), evolution.from_name);
        }
        EvolutionStage::Evolving => println!("{}", stage.headline()),
        EvolutionStage::Complete => {
            println!("{} {}", stage.headline(), evolution.to_name);
            for line in summary {
                println!("{line}");
            }
            println!("[c]ontinue");
        }
        EvolutionStage::Dismissing | EvolutionStage::Finished => {}
    }
}

fn poll_announcement(slot: &mut AnnouncementSlot) {
    // Read before polling: a finished announcement leaves the slot.
    let Some((evolution, summary)) = slot.current().map(|tl| (tl.event().clone(), tl.summary()))
    else {
        return;
    };
    for event in slot.poll() {
        if let Event::EvolutionStageChanged { stage, .. } = event {
            render_stage(&evolution, &summary, stage);
        }
    }
}

/// Plain completion acknowledgement. An evolution replaces it.
fn acknowledgement(outcome: &StopOutcome) -> Option<String> {
    match outcome {
        StopOutcome::Saved { .. } => Some(outcome.message()),
        StopOutcome::Evolved { .. } => None,
    }
}

/// Display-only estimate of the companion after `minutes` of study.
fn preview_line(companion: &Companion, minutes: u64) -> String {
    let preview = leveling::project_session(companion.level, companion.exp, minutes);
    let gained = leveling::exp_for_minutes(minutes);
    if preview.levels_gained > 0 {
        format!(
            "{}: Lv {} -> Lv {} (+{gained} EXP)",
            companion.name, companion.level, preview.level
        )
    } else {
        format!("{}: Lv {} (+{gained} EXP)", companion.name, preview.level)
    }
}

/// Stops and saves the session. On failure the session keeps running.
async fn finish(
    timer: &mut StudyTimer,
    slot: &mut AnnouncementSlot,
    companion: Option<&Companion>,
) -> Result<()> {
    let outcome = timer.stop().await?;
    if let Some(message) = acknowledgement(&outcome) {
        println!("\n{message}");
        if let Some(companion) = companion {
            println!("{}", preview_line(companion, outcome.duration_minutes()));
        }
    }
    if let StopOutcome::Evolved { evolution, .. } = outcome {
        slot.present(evolution)?;
        if let Some(timeline) = slot.current() {
            render_stage(timeline.event(), &timeline.summary(), EvolutionStage::Initial);
        }
    }
    Ok(())
}

async fn run_session(topic_id: i64, base_url: Option<&Url>) -> CliResult {
    let (config, service) = connect(base_url)?;
    let topics = service.list_topics().await?;
    let topic = topics
        .iter()
        .find(|t| t.id == topic_id)
        .ok_or_else(|| format!("topic {topic_id} not found"))?;
    let title = topic.title.clone();
    let companion = topic.companion();

    let service: Arc<dyn StudyService> = Arc::new(service);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut timer = StudyTimer::new(service, clock.clone());
    let mut slot = AnnouncementSlot::new(config.timeline_schedule(), clock);

    timer.select_topic(Some(topic_id))?;
    timer.start().await?;
    println!("Studying {title}. [p]ause [r]esume [s]top [q]uit");

    let mut ticker = tokio::time::interval(config.tick_interval());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                timer.tick();
                poll_announcement(&mut slot);
                if !stdin_open && slot.stage() == Some(EvolutionStage::Complete) {
                    // Nobody can press c any more.
                    slot.dismiss();
                }
                if timer.state() == TimerState::Idle && !slot.is_busy() {
                    break;
                }
                if timer.state().has_session() {
                    print_status(&timer);
                }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    // stdin closed: save what is running.
                    // Nobody is left to retry a failed save, so give up.
                    stdin_open = false;
                    if timer.state().has_session() {
                        finish(&mut timer, &mut slot, companion.as_ref()).await?;
                    }
                    continue;
                };
                match parse_command(&line) {
                    Some(Command::Pause) => {
                        if timer.pause().is_some() {
                            print_status(&timer);
                        }
                    }
                    Some(Command::Resume) => {
                        if timer.resume().is_some() {
                            print_status(&timer);
                        }
                    }
                    Some(Command::Stop) => {
                        if let Err(e) = finish(&mut timer, &mut slot, companion.as_ref()).await {
                            eprintln!("\nerror: {e}");
                            if timer.state().has_session() {
                                eprintln!("press s to retry");
                            }
                        }
                    }
                    Some(Command::Continue) => {
                        slot.dismiss();
                    }
                    Some(Command::Quit) => {
                        if timer.state().has_session() {
                            timer.reset();
                            println!("\nSession discarded.");
                        }
                        slot.clear();
                        break;
                    }
                    None => eprintln!("\nunknown command: {}", line.trim()),
                }
            }
        }
    }
    Ok(())
}

pub async fn run(action: TimerAction, base_url: Option<&Url>) -> CliResult {
    match action {
        TimerAction::Run { topic } => run_session(topic, base_url).await,
    }
}
