//! The `hashtagger train` command.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use hashtagger_core::{Config, TrainingPipeline, TrainingSummary};

/// Arguments for the `train` command.
#[derive(Args, Debug, Default)]
pub struct TrainArgs {
    /// Training CSV (defaults to `data.csv_path` from the config)
    pub csv: Option<PathBuf>,

    /// Directory to write the artifacts to (defaults to `general.artifact_dir`)
    #[arg(short, long)]
    pub artifacts: Option<PathBuf>,

    /// Seed for augmentation and SVM coordinate order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hashtags with fewer occurrences than this are augmented
    #[arg(long)]
    pub target_count: Option<usize>,

    /// Skip synonym augmentation
    #[arg(long)]
    pub no_augment: bool,

    /// Fit the three classifiers one after another
    #[arg(long)]
    pub sequential: bool,

    /// Print the training summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the train command.
pub async fn execute(args: TrainArgs, mut config: Config) -> anyhow::Result<()> {
    if args.seed.is_some() {
        config.augmentation.seed = args.seed;
    }
    if let Some(target) = args.target_count {
        config.augmentation.target_count = target;
    }
    if args.no_augment {
        config.augmentation.enabled = false;
    }
    if args.sequential {
        config.training.parallel = false;
    }

    let artifact_dir = args.artifacts.unwrap_or_else(|| config.artifact_dir());
    let pipeline = TrainingPipeline::new(config);
    let csv = match args.csv {
        Some(csv) => csv,
        None => pipeline.configured_csv()?,
    };

    tracing::info!("Training from {:?}", csv);
    let start = Instant::now();
    let spinner = create_spinner("Training ensemble...");
    let result = pipeline.run(&csv, &artifact_dir).await;
    spinner.finish_and_clear();

    let summary =
        result.with_context(|| format!("Training failed for {}", csv.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, start.elapsed());
    }
    Ok(())
}

fn create_spinner(message: &'static str) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn print_summary(summary: &TrainingSummary, elapsed: Duration) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("           Training Summary");
    eprintln!("  ====================================");
    eprintln!("    Original size:  {:>8}", summary.original_records);
    eprintln!(
        "    After augment:  {:>8}",
        summary.original_records + summary.synthetic_records
    );
    if let Some(report) = &summary.balance {
        eprintln!("    Rare records:   {:>8}", report.rare_records);
        eprintln!("    Below target:   {:>8}", report.labels_below_target);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Features:       {:>8}", summary.features);
    eprintln!("    Hashtags:       {:>8}", summary.labels);
    eprintln!("    Seed:     {:>14}", summary.seed);
    eprintln!("    Run id: {:>16}", summary.run_id);
    eprintln!("    Duration:     {:>8.1}s", elapsed.as_secs_f64());
    if let Some(dir) = &summary.artifact_dir {
        eprintln!("  ------------------------------------");
        eprintln!("    Saved to: {}", dir.display());
    }
    eprintln!("  ====================================");
    eprintln!();
}
