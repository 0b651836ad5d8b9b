use clap::{Parser, Subcommand};
use url::Url;

mod commands;

#[derive(Parser)]
#[command(name = "studymon", version, about = "Studymon CLI")]
struct Cli {
    /// Study service address (overrides service.base_url in the config file)
    #[arg(long, global = true)]
    base_url: Option<Url>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Study topics and their companions
    Topic {
        #[command(subcommand)]
        action: commands::topic::TopicAction,
    },
    /// Recorded study sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Study statistics
    Stats(commands::stats::StatsArgs),
    /// Strongest companion and its experience bar
    Ace(commands::ace::AceArgs),
    /// Study timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let base_url = cli.base_url.as_ref();
    let result = match cli.command {
        Commands::Topic { action } => commands::topic::run(action, base_url).await,
        Commands::Session { action } => commands::session::run(action, base_url).await,
        Commands::Stats(args) => commands::stats::run(args, base_url).await,
        Commands::Ace(args) => commands::ace::run(args, base_url).await,
        Commands::Timer { action } => commands::timer::run(action, base_url).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
