//! Hashtagger CLI - hashtag suggestions for short social-media posts.
//!
//! Hashtagger trains a three-model ensemble on a CSV of posts and their
//! hashtags, balancing rare hashtags with synonym-perturbed copies, and then
//! suggests the six most likely hashtags for new text.
//!
//! # Usage
//!
//! ```bash
//! # Train from a CSV with `ttext` and `htags` columns
//! hashtagger train tweets.csv
//!
//! # Suggest hashtags for one post
//! hashtagger suggest "sunny morning at the beach"
//!
//! # Suggest for a file of posts, one per line
//! hashtagger suggest --file posts.txt --format jsonl
//!
//! # Inspect the augmented corpus without training
//! hashtagger balance tweets.csv --output balanced.jsonl
//!
//! # Interactive prompt
//! hashtagger
//! ```

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use hashtagger_core::Config;

mod cli;
mod logging;

/// Hashtagger - hashtag suggestions for short social-media posts.
#[derive(Parser, Debug)]
#[command(name = "hashtagger")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, env = "HASHTAGGER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Train the ensemble from a CSV and save the artifacts
    Train(cli::train::TrainArgs),

    /// Clean and augment a CSV without training, writing the corpus out
    Balance(cli::balance::BalanceArgs),

    /// Suggest hashtags for text
    Suggest(cli::suggest::SuggestArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => match Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `hashtagger config path`."
                );
                Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Hashtagger v{}", hashtagger_core::VERSION);

    match cli.command {
        Some(Commands::Train(args)) => cli::train::execute(args, config).await,
        Some(Commands::Balance(args)) => cli::balance::execute(args, config).await,
        Some(Commands::Suggest(args)) => cli::suggest::execute(args, config).await,
        Some(Commands::Config(args)) => cli::config::execute(args, cli.config).await,
        None if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() => {
            cli::interactive::run(&config).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
