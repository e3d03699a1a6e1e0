mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "impactdash",
    about = "Sprint impact dashboard — score closed sprints from tracker history",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (YAML; defaults apply when absent)
    #[arg(long, global = true, env = "IMPACT_CONFIG", default_value = "impact.yaml")]
    config: PathBuf,

    /// Team whose sprints to score (overrides the config value)
    #[arg(long, global = true)]
    team: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch items from the tracker, score sprints, and write reports
    Run,

    /// Score sprints from an item snapshot file instead of the tracker
    Score {
        /// JSON snapshot of work items (as produced by the tracker fetch)
        #[arg(long)]
        items: PathBuf,
    },

    /// Show the flow-survey table the next run will use
    Flow,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        // Diagnostics on stderr; stdout carries only data.
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run => cmd::run::run(&cli.config, cli.team.as_deref(), cli.json),
        Commands::Score { items } => {
            cmd::score::run(&cli.config, &items, cli.team.as_deref(), cli.json)
        }
        Commands::Flow => cmd::flow::run(&cli.config, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
