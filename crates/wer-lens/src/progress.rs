//! Progress reporting for the term error analyzer.
//!
//! Row-level analysis over large corpora can take a while, so the analyzer
//! emits rate-limited progress updates through an optional reporter. The
//! reporter is decoupled from the aggregation algorithm itself; running
//! without one changes nothing about the results.
//!
//! # Example
//!
//! ```rust,ignore
//! use wer_lens::TermAnalyzer;
//!
//! let result = TermAnalyzer::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .analyze(&df)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of a term analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    /// Preparing the corpus and resolving the extractor
    Loading,
    /// Extracting terms and diffing per-row term sets
    RowAnalysis,
    /// Ranking counters and assembling the report
    ReportGeneration,
    /// Analysis completed successfully
    Complete,
    /// Analysis failed with an error
    Failed,
}

impl AnalysisStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Corpus",
            Self::RowAnalysis => "Analyzing Rows",
            Self::ReportGeneration => "Generating Report",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Returns the typical weight of this stage in the overall run (0.0 - 1.0).
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.05,
            Self::RowAnalysis => 0.85,
            Self::ReportGeneration => 0.10,
            Self::Complete => 0.0,
            Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::RowAnalysis => 0.05,
            Self::ReportGeneration => 0.90,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// Progress update emitted during a term analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current stage of the run
    pub stage: AnalysisStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within the current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,

    /// Number of rows processed so far (for the row analysis stage)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_processed: Option<usize>,

    /// Total rows to process (for the row analysis stage)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_total: Option<usize>,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage.
    pub fn new(stage: AnalysisStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
            rows_processed: None,
            rows_total: None,
        }
    }

    /// Creates a progress update with row counts.
    pub fn with_rows(
        stage: AnalysisStage,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        let stage_progress = if total > 0 {
            current as f32 / total as f32
        } else {
            0.0
        };
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
            rows_processed: Some(current),
            rows_total: Some(total),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: AnalysisStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
            rows_processed: None,
            rows_total: None,
        }
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: AnalysisStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
            rows_processed: None,
            rows_total: None,
        }
    }
}

/// Trait for receiving progress updates during analysis.
///
/// Implementations must be `Send + Sync` so a run can execute on a
/// background thread while reporting to a UI or log sink. This method may
/// be called frequently; implementations should be efficient and
/// non-blocking.
pub trait ProgressReporter: Send + Sync {
    /// Called when progress is made during analysis.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

// Progress updates cross thread boundaries when the analyzer runs in a
// background task.
static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(AnalysisStage::RowAnalysis, 0.5, "Analyzing...");
        assert_eq!(update.stage, AnalysisStage::RowAnalysis);
        assert_eq!(update.stage_progress, 0.5);
        assert_eq!(update.message, "Analyzing...");
    }

    #[test]
    fn test_progress_update_with_rows() {
        let update = ProgressUpdate::with_rows(AnalysisStage::RowAnalysis, 50, 100, "Row 50/100");
        assert_eq!(update.stage_progress, 0.5);
        assert_eq!(update.rows_processed, Some(50));
        assert_eq!(update.rows_total, Some(100));
    }

    #[test]
    fn test_progress_update_complete() {
        let update = ProgressUpdate::complete("Done");
        assert_eq!(update.stage, AnalysisStage::Complete);
        assert_eq!(update.progress, 1.0);
    }

    #[test]
    fn test_stage_weights_sum() {
        let stages = [
            AnalysisStage::Loading,
            AnalysisStage::RowAnalysis,
            AnalysisStage::ReportGeneration,
        ];
        let total: f32 = stages.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 0.01, "Weights should sum to ~1.0");
    }

    #[test]
    fn test_stage_json_values() {
        let expectations = [
            (AnalysisStage::Loading, "\"loading\""),
            (AnalysisStage::RowAnalysis, "\"row_analysis\""),
            (AnalysisStage::ReportGeneration, "\"report_generation\""),
            (AnalysisStage::Complete, "\"complete\""),
            (AnalysisStage::Failed, "\"failed\""),
        ];
        for (stage, expected) in expectations {
            let json = serde_json::to_string(&stage).expect("Should serialize");
            assert_eq!(json, expected);
        }
    }

    #[test]
    fn test_closure_progress_reporter() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::new(AnalysisStage::Loading, 0.0, "Start"));
        reporter.report(ProgressUpdate::complete("Done"));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_progress_reporter_across_threads() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = Arc::new(ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let reporter_clone = reporter.clone();
        let handle = std::thread::spawn(move || {
            reporter_clone.report(ProgressUpdate::with_rows(
                AnalysisStage::RowAnalysis,
                1,
                2,
                "Row 1/2",
            ));
        });

        handle.join().expect("Thread should not panic");
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
