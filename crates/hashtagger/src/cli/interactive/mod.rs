//! Interactive mode for bare `hashtagger` invocation on a TTY.
//!
//! Offers a menu to suggest hashtags in a prompt loop, train from a CSV, or
//! inspect the configuration. Each action reuses the flag-based commands'
//! core calls.

pub mod theme;

use std::path::PathBuf;

use console::Style;
use dialoguer::{Confirm, Input, Select};
use hashtagger_core::{Config, Scored, Suggester, TrainedArtifactSet, UNRECOGNIZED_MESSAGE};

use crate::cli::train::{self, TrainArgs};

/// Map a dialoguer result to `Ok(None)` on interrupt (Ctrl+C / terminal
/// disconnect) so the current flow exits cleanly.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const MENU_ITEMS: &[&str] = &[
    "Suggest hashtags",
    "Train models",
    "Show configuration",
    "Exit",
];

/// Entry point for interactive mode.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner();
    let theme = theme::hashtagger_theme();

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => suggest_loop(config)?,
            Some(1) => guided_train(config).await?,
            Some(2) => show_config(config),
            Some(3) | None => break,
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// Prompt for text repeatedly and print the suggested hashtags.
fn suggest_loop(config: &Config) -> anyhow::Result<()> {
    let theme = theme::hashtagger_theme();
    let warn = Style::new().for_stderr().yellow();
    let tags = Style::new().green().bold();
    let dim = Style::new().for_stderr().dim();

    let artifact_dir = config.artifact_dir();
    if !TrainedArtifactSet::exists(&artifact_dir) {
        eprintln!(
            "  {}",
            warn.apply_to(format!(
                "No trained models in {}. Choose \"Train models\" first.",
                artifact_dir.display()
            ))
        );
        return Ok(());
    }
    let suggester = Suggester::load(&artifact_dir, &config.suggest)?;
    eprintln!(
        "  {}",
        dim.apply_to("Type a post and press Enter. Ctrl+C returns to the menu.")
    );

    loop {
        let Some(text) = handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Post")
                .allow_empty(true)
                .interact_text(),
        )?
        else {
            return Ok(());
        };

        if text.trim().is_empty() {
            eprintln!("  {}", warn.apply_to("Please enter some text!"));
            continue;
        }

        match suggester.suggest(&text).outcome {
            Scored::Ranked(hashtags) => println!("  {}", tags.apply_to(hashtags.join(" "))),
            Scored::UnrecognizedInput => eprintln!("  {}", warn.apply_to(UNRECOGNIZED_MESSAGE)),
        }
    }
}

/// Ask for a CSV path, confirm, and run training.
async fn guided_train(config: &Config) -> anyhow::Result<()> {
    let theme = theme::hashtagger_theme();
    let warn = Style::new().for_stderr().yellow();

    let default_csv = config
        .csv_path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let csv = loop {
        let mut prompt = Input::<String>::with_theme(&theme).with_prompt("Training CSV");
        if !default_csv.is_empty() {
            prompt = prompt.default(default_csv.clone());
        }
        let Some(raw) = handle_interrupt(prompt.interact_text())? else {
            return Ok(());
        };

        let path = PathBuf::from(shellexpand::tilde(raw.trim()).into_owned());
        if path.is_file() {
            break path;
        }
        eprintln!(
            "  {}",
            warn.apply_to(format!("File not found: {}", path.display()))
        );
    };

    let artifact_dir = config.artifact_dir();
    let overwrite_note = if TrainedArtifactSet::exists(&artifact_dir) {
        " (replaces the current models)"
    } else {
        ""
    };
    let confirmed = Confirm::with_theme(&theme)
        .with_prompt(format!(
            "Train on {} and save to {}{}?",
            csv.display(),
            artifact_dir.display(),
            overwrite_note
        ))
        .default(true)
        .interact_opt()?;
    if confirmed != Some(true) {
        return Ok(());
    }

    let args = TrainArgs {
        csv: Some(csv),
        artifacts: Some(artifact_dir),
        ..TrainArgs::default()
    };
    if let Err(e) = train::execute(args, config.clone()).await {
        let err = Style::new().for_stderr().red();
        eprintln!("  {} {:#}", err.apply_to("✗"), e);
    }
    Ok(())
}

fn show_config(config: &Config) {
    let dim = Style::new().for_stderr().dim();
    let heading = Style::new().for_stderr().magenta();
    let label = Style::new().for_stderr().bold();

    let config_path = Config::default_path();
    let path_note = if config_path.exists() {
        "(exists)"
    } else {
        "(using defaults)"
    };

    eprintln!();
    eprintln!("  {}", heading.apply_to("Current configuration:"));
    eprintln!();
    eprintln!(
        "    {:<20} {} {}",
        label.apply_to("Config file:"),
        config_path.display(),
        dim.apply_to(path_note)
    );
    eprintln!(
        "    {:<20} {}",
        label.apply_to("Artifacts:"),
        config.artifact_dir().display()
    );
    eprintln!(
        "    {:<20} {}",
        label.apply_to("Lexicon:"),
        config.lexicon_dir().display()
    );
    eprintln!(
        "    {:<20} {}",
        label.apply_to("Augmentation:"),
        if config.augmentation.enabled {
            format!(
                "below {} occurrences, {} variants each",
                config.augmentation.target_count, config.augmentation.variants_per_record
            )
        } else {
            "disabled".to_string()
        }
    );
    eprintln!(
        "    {:<20} {} (n-grams {}..={})",
        label.apply_to("TF-IDF features:"),
        config.features.max_features,
        config.features.ngram_min,
        config.features.ngram_max
    );
    eprintln!(
        "    {:<20} {}",
        label.apply_to("Suggestions:"),
        config.suggest.top_k
    );
    eprintln!(
        "    {:<20} {}",
        label.apply_to("Log level:"),
        config.logging.level
    );
    eprintln!();
}
