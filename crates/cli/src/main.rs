use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "pesa", version, about = "Summarize and categorize M-PESA statements")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Classify with rules only, even when an API key is configured
    #[arg(long, global = true)]
    no_semantic: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the income/expense summary of a statement (.pdf, .csv or text)
    Summarize { path: PathBuf },

    /// Print every recovered transaction with its category, plus the summary
    Parse { path: PathBuf },

    /// Classify a single transaction description
    Classify { description: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let pipeline = commands::build_pipeline(&config, !cli.no_semantic)?;

    match cli.command {
        Command::Summarize { path } => {
            let report = commands::process(&pipeline, &path).await?;
            commands::print_json(&report.summary, cli.pretty)?;
        }
        Command::Parse { path } => {
            let report = commands::process(&pipeline, &path).await?;
            commands::print_json(&report, cli.pretty)?;
        }
        Command::Classify { description } => {
            let out = commands::classify(&pipeline, &description).await;
            commands::print_json(&out, cli.pretty)?;
        }
    }

    Ok(())
}
