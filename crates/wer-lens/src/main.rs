//! CLI entry point for the WER analysis toolkit.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use wer_lens::{
    AnalyzerConfig, DEFAULT_RARITY_THRESHOLD, DEFAULT_TOP_TERMS, ReportGenerator, TermAnalyzer,
    merge_splits, utils::load_csv, wer_stats, write_dashboard_json,
};

/// Conventional input file names, matching what the evaluation harness
/// writes next to this tool.
const DEFAULT_DATASET: &str = "wer_prediction_dataset_extended.csv";
const DEFAULT_TRAIN: &str = "wer_prediction_train.csv";
const DEFAULT_VAL: &str = "wer_prediction_val.csv";
const DEFAULT_TEST: &str = "wer_prediction_test.csv";
const DEFAULT_MERGED: &str = "merged_wer_data.csv";
const DEFAULT_DASHBOARD_JSON: &str = "dashboard/public/data/wer_data.json";
const DEFAULT_REPORT_JSON: &str = "term_error_analysis.json";

#[derive(Parser, Debug)]
#[command(
    author = "WER Lens Team",
    version,
    about = "ASR evaluation analytics for WER datasets",
    long_about = "Converts WER evaluation datasets for the dashboard and\n\
                  computes term-level error reports.\n\n\
                  EXAMPLES:\n  \
                  # Convert the conventional dataset for the dashboard\n  \
                  wer-lens convert\n\n  \
                  # Analyze term errors on the first 500 rows\n  \
                  wer-lens analyze data.csv --sample-limit 500\n\n  \
                  # Merge split files with provenance tags\n  \
                  wer-lens merge --train train.csv --val val.csv --test test.csv"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a WER dataset to column-major JSON for the dashboard
    Convert {
        /// Path to the CSV file to convert
        ///
        /// Defaults to the conventional dataset name; if that is absent
        /// but the conventional train/val/test splits exist, they are
        /// merged first.
        input: Option<PathBuf>,

        /// Output JSON file path
        #[arg(short, long, default_value = DEFAULT_DASHBOARD_JSON)]
        output: PathBuf,
    },

    /// Analyze term-level errors between predictions and ground truth
    Analyze {
        /// Path to the CSV file to analyze
        input: Option<PathBuf>,

        /// Output JSON report path
        #[arg(short, long, default_value = DEFAULT_REPORT_JSON)]
        output: PathBuf,

        /// Analyze only the first N rows (for speed)
        #[arg(long)]
        sample_limit: Option<usize>,

        /// Use lexicon-backed extraction (falls back to patterns if the
        /// lexicon cannot be loaded)
        #[arg(long)]
        advanced: bool,

        /// Path to a newline-delimited term lexicon
        #[arg(long)]
        lexicon: Option<PathBuf>,

        /// Rarity threshold for the rare-missed ranking
        #[arg(long, default_value_t = DEFAULT_RARITY_THRESHOLD)]
        rarity_threshold: u64,

        /// Cap on each ranked term list in the report
        #[arg(long, default_value_t = DEFAULT_TOP_TERMS)]
        top_terms: usize,
    },

    /// Merge train/validation/test splits into one tagged CSV
    Merge {
        /// Path to the train split
        #[arg(long, default_value = DEFAULT_TRAIN)]
        train: PathBuf,

        /// Path to the validation split
        #[arg(long, default_value = DEFAULT_VAL)]
        val: PathBuf,

        /// Path to the test split
        #[arg(long, default_value = DEFAULT_TEST)]
        test: PathBuf,

        /// Output merged CSV path
        #[arg(short, long, default_value = DEFAULT_MERGED)]
        output: PathBuf,
    },
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    match args.command {
        Command::Convert { input, output } => run_convert(input, &output),
        Command::Analyze {
            input,
            output,
            sample_limit,
            advanced,
            lexicon,
            rarity_threshold,
            top_terms,
        } => run_analyze(
            input,
            &output,
            sample_limit,
            advanced,
            lexicon,
            rarity_threshold,
            top_terms,
            args.quiet,
        ),
        Command::Merge {
            train,
            val,
            test,
            output,
        } => run_merge(&train, &val, &test, &output),
    }
}

/// Resolve the convert input: explicit path, the conventional dataset, or
/// the conventional splits merged on the fly.
fn resolve_convert_input(input: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = input {
        if !path.exists() {
            return Err(anyhow!("Input file not found: {}", path.display()));
        }
        return Ok(path);
    }

    let default = Path::new(DEFAULT_DATASET);
    if default.exists() {
        return Ok(default.to_path_buf());
    }

    let splits = [DEFAULT_TRAIN, DEFAULT_VAL, DEFAULT_TEST];
    if splits.iter().all(|p| Path::new(p).exists()) {
        info!("Found split files; merging before conversion");
        let summary = merge_splits(
            Path::new(DEFAULT_TRAIN),
            Path::new(DEFAULT_VAL),
            Path::new(DEFAULT_TEST),
            Path::new(DEFAULT_MERGED),
        )?;
        return Ok(summary.output);
    }

    Err(anyhow!(
        "No data files found. Provide an input path, or place either {} or \
         the split trio ({}, {}, {}) in the current directory.",
        DEFAULT_DATASET,
        DEFAULT_TRAIN,
        DEFAULT_VAL,
        DEFAULT_TEST
    ))
}

/// Resolve the analyze input: explicit path or the conventional dataset.
fn resolve_analyze_input(input: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = input {
        if !path.exists() {
            return Err(anyhow!("Input file not found: {}", path.display()));
        }
        return Ok(path);
    }

    let default = Path::new(DEFAULT_DATASET);
    if default.exists() {
        return Ok(default.to_path_buf());
    }

    Err(anyhow!(
        "No data files found. Provide an input path or place {} in the current directory.",
        DEFAULT_DATASET
    ))
}

fn run_convert(input: Option<PathBuf>, output: &Path) -> Result<()> {
    let input = resolve_convert_input(input)?;

    info!("Loading dataset from: {}", input.display());
    let df = load_csv(&input)?;
    info!("Dataset loaded: {:?}", df.shape());

    write_dashboard_json(&df, output)?;

    println!(
        "Converted {} rows -> {}",
        df.height(),
        output.display()
    );

    if let Some(stats) = wer_stats(&df)? {
        println!("Sample stats:");
        println!("  Avg WER:             {:.3}", stats.mean);
        println!("  Median WER:          {:.3}", stats.median);
        println!("  90th percentile WER: {:.3}", stats.p90);
        println!("  High WER rate:       {:.1}%", stats.high_wer_rate * 100.0);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_analyze(
    input: Option<PathBuf>,
    output: &Path,
    sample_limit: Option<usize>,
    advanced: bool,
    lexicon: Option<PathBuf>,
    rarity_threshold: u64,
    top_terms: usize,
    quiet: bool,
) -> Result<()> {
    let input = resolve_analyze_input(input)?;

    info!("Loading dataset from: {}", input.display());
    let df = load_csv(&input)?;
    info!("Dataset loaded: {:?}", df.shape());

    let mut config_builder = AnalyzerConfig::builder()
        .rarity_threshold(rarity_threshold)
        .top_terms(top_terms)
        .use_advanced_extraction(advanced);

    if let Some(limit) = sample_limit {
        config_builder = config_builder.sample_limit(limit);
    }
    if let Some(path) = lexicon {
        config_builder = config_builder.lexicon_path(path);
    }
    let config = config_builder.build()?;

    let mut builder = TermAnalyzer::builder().config(config);
    if !quiet {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    let result = builder.build()?.analyze(&df)?;

    let report_path = ReportGenerator::new(output).write(&result.report)?;
    print_analysis_summary(&result, rarity_threshold);
    println!("\nReport saved to {}", report_path.display());

    Ok(())
}

/// Print a human-readable summary of the analysis results.
///
/// This uses `println!` intentionally: it is the primary output of the
/// command and should be visible regardless of log level.
fn print_analysis_summary(result: &wer_lens::AnalysisResult, rarity_threshold: u64) {
    let summary = &result.report.summary;

    println!();
    println!("{}", "=".repeat(60));
    println!("TERM ERROR ANALYSIS");
    println!("{}", "=".repeat(60));
    println!("Term-level recall:  {:.3}", summary.term_recall);
    println!("Total GT terms:     {}", summary.total_gt_terms);
    println!("Total missed:       {}", summary.total_missed);
    println!("Total hallucinated: {}", summary.total_hallucinated);
    println!("Samples analyzed:   {}", summary.samples_analyzed);

    let unique_missed = result.stats.unique_missed_terms();
    let rare_total = result.stats.rare_missed_ranking(rarity_threshold).len();
    let shown = result.report.top_missed_terms_rare.len().min(20);

    println!();
    println!(
        "Top missed terms with < {} total occurrences \
         (showing {} of {} rare terms, {} unique missed terms overall):",
        rarity_threshold, shown, rare_total, unique_missed
    );
    println!("{}", "-".repeat(60));
    for entry in result.report.top_missed_terms_rare.iter().take(20) {
        println!(
            "  {:<30} missed {:>4} / {:>4} ({:.1}%)",
            entry.term,
            entry.missed_count,
            entry.total_occurrences,
            entry.miss_rate * 100.0
        );
    }

    println!();
    println!("Top hallucinated terms:");
    println!("{}", "-".repeat(60));
    for entry in result.report.top_hallucinated_terms.iter().take(20) {
        println!("  {:<30} count {:>4}", entry.term, entry.count);
    }
}

fn run_merge(train: &Path, val: &Path, test: &Path, output: &Path) -> Result<()> {
    let summary = merge_splits(train, val, test, output)?;

    println!("Merged {} rows -> {}", summary.total_rows(), output.display());
    println!("  Train: {}", summary.train_rows);
    println!("  Val:   {}", summary.val_rows);
    println!("  Test:  {}", summary.test_rows);

    Ok(())
}
