//! The `hashtagger balance` command: clean and augment a CSV, then dump the
//! resulting corpus instead of training on it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use hashtagger_core::{Config, OutputWriter, TrainingPipeline};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::types::OutputFormat;

/// Arguments for the `balance` command.
#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Training CSV (defaults to `data.csv_path` from the config)
    pub csv: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "jsonl")]
    pub format: OutputFormat,

    /// Seed for synonym sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hashtags with fewer occurrences than this are augmented
    #[arg(long)]
    pub target_count: Option<usize>,

    /// Write only the synthetic records
    #[arg(long)]
    pub synthetic_only: bool,
}

/// Execute the balance command.
pub async fn execute(args: BalanceArgs, mut config: Config) -> anyhow::Result<()> {
    config.augmentation.enabled = true;
    if let Some(target) = args.target_count {
        config.augmentation.target_count = target;
    }
    let seed = args
        .seed
        .or(config.augmentation.seed)
        .unwrap_or_else(rand::random);
    let pretty = config.output.pretty;

    let pipeline = TrainingPipeline::new(config);
    let csv = match args.csv {
        Some(csv) => csv,
        None => pipeline.configured_csv()?,
    };
    let corpus = pipeline
        .load_corpus(&csv)
        .with_context(|| format!("Failed to load corpus from {}", csv.display()))?;
    let lexicon = pipeline.load_lexicon()?;

    let mut rng = StdRng::seed_from_u64(seed);
    let (corpus, report) = pipeline.balance(corpus, &lexicon, &mut rng);

    let records = if args.synthetic_only {
        corpus.synthetic()
    } else {
        corpus.records()
    };

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = OutputWriter::new(sink, args.format.into(), pretty);
    writer.write_all(records)?;
    writer.flush()?;

    if let Some(path) = &args.output {
        tracing::info!("Wrote {} records to {:?}", writer.items_written(), path);
    }

    eprintln!("Original size: {}", corpus.originals().len());
    eprintln!("Size after synthetic augmentation: {}", corpus.len());
    if let Some(report) = report {
        tracing::info!(
            "Seed {}: {} rare records, {} of {} candidates kept, {} labels below target",
            seed,
            report.rare_records,
            report.synthetic_added,
            report.candidates_generated,
            report.labels_below_target
        );
    }
    Ok(())
}
