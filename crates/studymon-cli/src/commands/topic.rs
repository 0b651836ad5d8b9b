//! Topic listing and deletion.

use clap::Subcommand;
use studymon_core::leveling;
use studymon_core::stats::format_minutes;
use studymon_core::{StudyService, StudySnapshot, Topic};
use url::Url;

use super::{connect, CliResult};

#[derive(Subcommand)]
pub enum TopicAction {
    /// List topics with their companions
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a topic and its sessions
    Delete {
        /// Topic ID
        id: i64,
    },
}

fn describe(topic: &Topic) -> String {
    let companion = match topic.companion() {
        Some(c) => format!(
            "{} Lv {} ({:.0}%)",
            c.name,
            c.level,
            leveling::progress_percent(c.level, c.exp)
        ),
        None => "-".to_string(),
    };
    format!(
        "{:>4}  {:<24} {:<12} {:>8}  {}",
        topic.id,
        topic.title,
        topic.status.as_str(),
        format_minutes(topic.minutes_spent),
        companion
    )
}

pub async fn run(action: TopicAction, base_url: Option<&Url>) -> CliResult {
    let (_config, service) = connect(base_url)?;

    match action {
        TopicAction::List { json } => {
            let topics = service.list_topics().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&topics)?);
            } else if topics.is_empty() {
                println!("No topics yet.");
            } else {
                for topic in &topics {
                    println!("{}", describe(topic));
                }
            }
        }
        TopicAction::Delete { id } => {
            let mut snapshot = StudySnapshot::fetch(&service, None).await?;
            snapshot.delete_topic(&service, id).await?;
            println!("Topic {id} deleted ({} topics left)", snapshot.topics.len());
        }
    }
    Ok(())
}
