//! Session history commands.

use chrono::Local;
use clap::Subcommand;
use studymon_core::stats::UNKNOWN_TOPIC;
use studymon_core::StudySnapshot;
use url::Url;

use super::{connect, CliResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// List recorded sessions, newest first
    List {
        /// Only sessions for this topic
        #[arg(long)]
        topic: Option<i64>,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete one session
    Delete {
        /// Session ID
        id: i64,
    },
}

pub async fn run(action: SessionAction, base_url: Option<&Url>) -> CliResult {
    let (_config, service) = connect(base_url)?;

    match action {
        SessionAction::List { topic, json } => {
            let snapshot = StudySnapshot::fetch(&service, topic).await?;
            let mut sessions = snapshot.sessions.clone();
            sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));

            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
                return Ok(());
            }
            if sessions.is_empty() {
                println!("No sessions recorded.");
                return Ok(());
            }
            for session in &sessions {
                let title = snapshot
                    .topic(session.topic_id)
                    .map(|t| t.title.as_str())
                    .unwrap_or(UNKNOWN_TOPIC);
                let status = if session.is_finished() { "" } else { " (open)" };
                println!(
                    "{:>4}  {}  {:<24} {:>4} min{}",
                    session.id,
                    session.start_time.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    title,
                    session.duration_minutes,
                    status
                );
            }
        }
        SessionAction::Delete { id } => {
            let mut snapshot = StudySnapshot::fetch(&service, None).await?;
            snapshot.delete_session(&service, id).await?;
            println!("Session {id} deleted ({} sessions left)", snapshot.sessions.len());
        }
    }
    Ok(())
}
