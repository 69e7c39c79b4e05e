//! The `hashtagger suggest` command.

use std::fs::File;
use std::io::{BufRead, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use hashtagger_core::{Config, OutputWriter, Suggester, SuggestionRecord};

use super::types::OutputFormat;

/// Arguments for the `suggest` command.
#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Text to suggest hashtags for (reads stdin when omitted)
    pub text: Option<String>,

    /// File with one text per line
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Artifact directory (defaults to `general.artifact_dir`)
    #[arg(short, long)]
    pub artifacts: Option<PathBuf>,

    /// Number of hashtags to return
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output format (defaults to `output.format`)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the suggest command.
pub async fn execute(args: SuggestArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(top_k) = args.top_k {
        anyhow::ensure!(top_k > 0, "--top-k must be greater than 0");
        config.suggest.top_k = top_k;
    }
    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from_config(&config.output.format));

    let inputs = match (&args.text, &args.file) {
        (Some(text), _) => vec![text.clone()],
        (None, Some(path)) => read_lines(path)?,
        (None, None) => {
            if std::io::stdin().is_terminal() {
                anyhow::bail!("No input: pass TEXT, --file, or pipe text on stdin");
            }
            read_texts(std::io::stdin().lock())?
        }
    };
    if inputs.iter().all(|t| t.trim().is_empty()) {
        anyhow::bail!("Please enter some text!");
    }

    let artifact_dir = args.artifacts.unwrap_or_else(|| config.artifact_dir());
    let suggester = Suggester::load(&artifact_dir, &config.suggest).with_context(|| {
        format!(
            "Failed to load models from {} (run `hashtagger train` first)",
            artifact_dir.display()
        )
    })?;

    let progress = (inputs.len() > 1 && std::io::stderr().is_terminal())
        .then(|| create_progress_bar(inputs.len() as u64));
    let mut records = Vec::with_capacity(inputs.len());
    let mut unrecognized = 0usize;
    for text in &inputs {
        let record = SuggestionRecord::from(&suggester.suggest(text));
        if !record.recognized {
            unrecognized += 1;
        }
        records.push(record);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    if unrecognized > 0 && inputs.len() > 1 {
        tracing::info!(
            "{} of {} texts had no known vocabulary",
            unrecognized,
            inputs.len()
        );
    }

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = OutputWriter::new(sink, format.into(), config.output.pretty);
    if records.len() == 1 && format != OutputFormat::Json {
        writer.write(&records[0])?;
    } else {
        writer.write_all(&records)?;
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        tracing::info!("Output written to {:?}", path);
    }
    Ok(())
}

/// Non-empty lines of a text file.
fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_texts(std::io::BufReader::new(file))
}

fn read_texts(reader: impl BufRead) -> anyhow::Result<Vec<String>> {
    let mut texts = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            texts.push(line);
        }
    }
    Ok(texts)
}

fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("scoring...");
    pb
}
