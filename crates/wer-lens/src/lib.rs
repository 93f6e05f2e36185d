//! WER Lens: ASR Evaluation Analytics
//!
//! A toolkit for working with word-error-rate (WER) evaluation datasets,
//! built with Rust and Polars.
//!
//! # Overview
//!
//! Two independent pipelines share no state:
//!
//! - **Dashboard conversion**: loads a row-oriented WER dataset, validates
//!   column presence, restructures it column-major (one JSON array per
//!   known column, nulls normalized) and writes the result for the
//!   visualization front end. Split train/val/test files can be merged
//!   first with a provenance tag.
//! - **Term error analysis**: extracts candidate vocabulary terms from
//!   each row's predicted and ground-truth text, diffs the per-row term
//!   sets, accumulates missed/hallucinated/frequency counters across the
//!   corpus and emits a ranked report with term-level recall.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wer_lens::{AnalyzerConfig, ReportGenerator, TermAnalyzer};
//! use wer_lens::utils::load_csv;
//!
//! let df = load_csv("wer_prediction_dataset_extended.csv".as_ref())?;
//!
//! let result = TermAnalyzer::builder()
//!     .config(AnalyzerConfig::builder().sample_limit(500).build()?)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .analyze(&df)?;
//!
//! println!("Term recall: {:.3}", result.report.summary.term_recall);
//! ReportGenerator::new("term_error_analysis.json").write(&result.report)?;
//! ```
//!
//! # Extraction Modes
//!
//! Term extraction is pattern-based by default (a fixed list of lexical
//! pattern families; a deliberate heuristic that over- and under-matches).
//! When a term lexicon file is configured, the lexicon-backed extractor is
//! used instead; if it cannot be loaded the analyzer falls back to pattern
//! extraction transparently. See [`extractor`] for both implementations.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod merge;
pub mod progress;
pub mod reporting;
pub mod reshape;
pub mod utils;

// Re-exports for convenient access
pub use analyzer::{AnalysisResult, CorpusAggregator, RowAnalysis, TermAnalyzer, analyze_row};
pub use config::{
    AnalyzerConfig, AnalyzerConfigBuilder, ConfigValidationError, DEFAULT_RARITY_THRESHOLD,
    DEFAULT_TOP_TERMS,
};
pub use error::{AnalysisError, ResultExt};
pub use extractor::{
    LexiconExtractor, PATTERN_FAMILIES, PatternExtractor, TermExtractor, TermSet,
    resolve_extractor,
};
pub use merge::{MergeSummary, SPLIT_COLUMN, merge_splits, tag_and_concat};
pub use progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
pub use reporting::{
    HallucinatedTermEntry, MissedTermEntry, ReportGenerator, ReportSummary, TermErrorReport,
};
pub use reshape::{
    DASHBOARD_COLUMNS, WerStats, reshape_for_dashboard, wer_stats, write_dashboard_json,
};
