//! Term error analysis.
//!
//! This module provides the row-level analyzer, the corpus aggregator and
//! the [`TermAnalyzer`] front door that wires extractor resolution,
//! aggregation and report building together.

mod corpus;
mod row;

pub use corpus::CorpusAggregator;
pub use row::{RowAnalysis, analyze_row};

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::extractor::{TermExtractor, resolve_extractor};
use crate::progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::reporting::TermErrorReport;
use polars::prelude::*;
use std::sync::Arc;
use tracing::{error, info};

/// Outcome of a term analysis run.
///
/// The report is the serializable artifact; the aggregator keeps the full
/// uncapped rankings for "N of M shown" displays.
#[derive(Debug)]
pub struct AnalysisResult {
    pub report: TermErrorReport,
    pub stats: CorpusAggregator,
}

/// The term error analyzer.
///
/// Use [`TermAnalyzer::builder()`] to configure a run. The extractor is
/// resolved once at build time and reused for every row.
///
/// # Example
///
/// ```rust,ignore
/// use wer_lens::{AnalyzerConfig, TermAnalyzer};
///
/// let result = TermAnalyzer::builder()
///     .config(AnalyzerConfig::builder().sample_limit(500).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .analyze(&df)?;
///
/// println!("Term recall: {:.3}", result.report.summary.term_recall);
/// ```
pub struct TermAnalyzer {
    config: AnalyzerConfig,
    extractor: Box<dyn TermExtractor>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(TermAnalyzer: Send);

impl std::fmt::Debug for TermAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermAnalyzer")
            .field("config", &self.config)
            .field("extractor", &self.extractor.name())
            .finish_non_exhaustive()
    }
}

impl TermAnalyzer {
    /// Create a new analyzer builder.
    pub fn builder() -> TermAnalyzerBuilder {
        TermAnalyzerBuilder::default()
    }

    /// Analyze a corpus and build the term error report.
    ///
    /// # Errors
    ///
    /// Fails when the `pred_text` or `gt_text` column is absent. A corpus
    /// with zero rows or zero ground-truth terms is not an error; recall
    /// is reported as 0.
    pub fn analyze(&self, df: &DataFrame) -> Result<AnalysisResult> {
        match self.analyze_internal(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Analysis complete"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Term analysis failed: {}", e);
                Err(e)
            }
        }
    }

    fn analyze_internal(&self, df: &DataFrame) -> Result<AnalysisResult> {
        let planned = match self.config.sample_limit {
            Some(limit) => limit.min(df.height()),
            None => df.height(),
        };
        info!(
            "Analyzing {} of {} rows with {} extraction...",
            planned,
            df.height(),
            self.extractor.name()
        );
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            1.0,
            format!("Corpus ready: {} rows", df.height()),
        ));

        let stats = CorpusAggregator::analyze_frame(
            df,
            self.extractor.as_ref(),
            self.config.sample_limit,
            self.progress_reporter.as_deref(),
        )?;

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::ReportGeneration,
            0.0,
            "Ranking term counters...",
        ));
        let report = TermErrorReport::from_stats(&stats, &self.config);

        info!(
            "Term recall {:.3} over {} samples ({} missed, {} hallucinated)",
            report.summary.term_recall,
            report.summary.samples_analyzed,
            report.summary.total_missed,
            report.summary.total_hallucinated,
        );

        Ok(AnalysisResult { report, stats })
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }
}

/// Builder for [`TermAnalyzer`].
#[derive(Default)]
pub struct TermAnalyzerBuilder {
    config: AnalyzerConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl TermAnalyzerBuilder {
    /// Set the analyzer configuration.
    pub fn config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a closure-based progress callback.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Validate the configuration, resolve the extractor and build the
    /// analyzer.
    pub fn build(self) -> Result<TermAnalyzer> {
        self.config
            .validate()
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;

        let extractor = resolve_extractor(&self.config);

        Ok(TermAnalyzer {
            config: self.config,
            extractor,
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_analyze_small_corpus() {
        let df = df!(
            "pred_text" => ["patient has bronchitis", "no findings"],
            "gt_text" => ["patient has pneumonia and bronchitis", "chronic arthritis"],
        )
        .unwrap();

        let result = TermAnalyzer::builder().build().unwrap().analyze(&df).unwrap();
        assert_eq!(result.report.summary.samples_analyzed, 2);
        assert_eq!(result.report.summary.total_missed, 1);
        assert_eq!(result.stats.unique_missed_terms(), 1);
    }

    #[test]
    fn test_progress_callback_invoked() {
        let df = df!(
            "pred_text" => ["has arthritis"],
            "gt_text" => ["has arthritis"],
        )
        .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        TermAnalyzer::builder()
            .on_progress(move |_update| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap()
            .analyze(&df)
            .unwrap();

        // Loading, at least one row update, report generation, complete.
        assert!(calls.load(Ordering::SeqCst) >= 4);
    }

    #[test]
    fn test_missing_column_fails() {
        let df = df!("gt_text" => ["only ground truth"]).unwrap();
        let err = TermAnalyzer::builder()
            .build()
            .unwrap()
            .analyze(&df)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ColumnNotFound(_)));
    }

    #[test]
    fn test_debug_output_names_extractor() {
        let analyzer = TermAnalyzer::builder().build().unwrap();
        let formatted = format!("{:?}", analyzer);
        assert!(formatted.contains("TermAnalyzer"));
        assert!(formatted.contains("pattern"));
    }

    #[test]
    fn test_invalid_config_rejected_at_build() {
        let mut config = AnalyzerConfig::default();
        config.top_terms = 0;
        let err = TermAnalyzer::builder().config(config).build().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }
}
