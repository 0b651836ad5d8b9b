use clap::Args;
use studymon_core::evolution::sprite_url;
use studymon_core::{ace_progress, StudyService};
use url::Url;

use super::{bar, connect, CliResult};

#[derive(Args)]
pub struct AceArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: AceArgs, base_url: Option<&Url>) -> CliResult {
    let (_config, service) = connect(base_url)?;
    let topics = service.list_topics().await?;
    let ace = ace_progress(&topics);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ace)?);
        return Ok(());
    }

    let Some(ace) = ace else {
        println!("No companions yet. Add a topic to get one.");
        return Ok(());
    };
    let companion = &ace.companion;
    println!("{} (Lv {})  studying {}", companion.name, companion.level, ace.topic_title);
    println!(
        "EXP {} / {}  {} {:.0}%",
        ace.exp_in_level,
        ace.exp_needed,
        bar(ace.progress, 20),
        ace.percent()
    );
    println!("{} EXP to Lv {}", ace.exp_remaining, companion.level + 1);
    let sprite = companion
        .sprite
        .clone()
        .unwrap_or_else(|| sprite_url(companion.creature_id));
    println!("{sprite}");
    Ok(())
}
