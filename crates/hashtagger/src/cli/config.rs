//! The `hashtagger config` command for configuration management.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use hashtagger_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,

    /// Show config file path
    Path,

    /// Write a config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command against `path` or the default location.
pub async fn execute(args: ConfigArgs, path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(Config::default_path);

    match args.command {
        ConfigCommand::Show => {
            let config = if path.exists() {
                Config::load_from(&path)?
            } else {
                Config::default()
            };
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, Config::default().to_toml()?)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
            println!("{}", lexicon_hint(&Config::default()));
        }
    }

    Ok(())
}

/// Where synonym augmentation looks for its WordNet export.
fn lexicon_hint(config: &Config) -> String {
    let dir = config.lexicon_dir();
    format!(
        "Synonym augmentation reads a WordNet export from: {}\n  \
         dictionary.txt  one word per line\n  \
         synsets.txt     <synset id><TAB><lemma>|<lemma>|...\n\
         Without these files training runs without augmentation.",
        dir.display()
    )
}
