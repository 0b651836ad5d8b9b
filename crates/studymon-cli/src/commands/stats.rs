use chrono::Local;
use clap::Args;
use studymon_core::stats::{format_minutes, max_day_minutes, max_topic_minutes};
use studymon_core::{StudyReport, StudySnapshot};
use url::Url;

use super::{bar, connect, CliResult};

const BAR_WIDTH: usize = 30;

#[derive(Args)]
pub struct StatsArgs {
    /// Only count sessions for this topic
    #[arg(long)]
    topic: Option<i64>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn render(report: &StudyReport) {
    println!("Total study time:  {}", format_minutes(report.total_minutes));
    println!("Sessions:          {}", report.session_count);
    println!("Average session:   {}", format_minutes(report.average_session_minutes));
    if let Some(top) = &report.most_studied {
        println!(
            "Most studied:      {} ({})",
            top.topic_name,
            format_minutes(top.minutes)
        );
    }

    println!();
    println!("By topic");
    let max = max_topic_minutes(&report.by_topic);
    for total in &report.by_topic {
        println!(
            "  {:<24} {} {:>8}  {} sessions",
            total.topic_name,
            bar(total.share_of_max(max), BAR_WIDTH),
            format_minutes(total.minutes),
            total.session_count
        );
    }

    println!();
    println!("Last 7 days");
    let max = max_day_minutes(&report.last_seven_days);
    for day in &report.last_seven_days {
        println!(
            "  {:<7} {} {:>8}",
            day.label,
            bar(day.minutes as f64 / max as f64, BAR_WIDTH),
            format_minutes(day.minutes)
        );
    }
}

pub async fn run(args: StatsArgs, base_url: Option<&Url>) -> CliResult {
    let (_config, service) = connect(base_url)?;
    let snapshot = StudySnapshot::fetch(&service, args.topic).await?;
    let report = snapshot.report(Local::now().date_naive(), &Local);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_empty() {
        println!("No study sessions yet. Start a timer to begin tracking.");
    } else {
        render(&report);
    }
    Ok(())
}
