//! Report types for term error analysis.
//!
//! This module provides the serializable report produced at the end of an
//! aggregation pass, plus the generator that writes it to disk.

mod generator;

pub use generator::ReportGenerator;

use crate::analyzer::CorpusAggregator;
use crate::config::AnalyzerConfig;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Summary scalars for a term error analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Fraction of ground-truth term occurrences that were not missed.
    /// Exactly 0.0 for a degenerate corpus with no ground-truth terms.
    pub term_recall: f64,
    /// Total ground-truth term occurrences summed across rows.
    pub total_gt_terms: u64,
    /// Total missed term occurrences summed across rows.
    pub total_missed: u64,
    /// Total hallucinated term occurrences summed across rows.
    pub total_hallucinated: u64,
    /// Number of rows analyzed.
    pub samples_analyzed: usize,
}

/// One entry of a missed-term ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissedTermEntry {
    pub term: String,
    /// Number of rows where the term was in ground truth but absent from
    /// the prediction.
    pub missed_count: u64,
    /// Number of rows where the term appeared in ground truth at all.
    pub total_occurrences: u64,
    /// missed_count / max(total_occurrences, 1). The floor of 1 keeps the
    /// rate finite for terms that never appeared as a true ground-truth
    /// term.
    pub miss_rate: f64,
}

/// One entry of the hallucinated-term ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HallucinatedTermEntry {
    pub term: String,
    /// Number of rows where the term was predicted but absent from ground
    /// truth.
    pub count: u64,
}

/// The immutable report produced by a term analysis pass.
///
/// Ranked lists are capped (default top 50); the full rankings and their
/// true lengths remain obtainable from the [`CorpusAggregator`] for
/// "N of M shown" displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermErrorReport {
    /// Timestamp when the report was generated.
    pub generated_at: String,
    pub summary: ReportSummary,
    pub top_missed_terms_rare: Vec<MissedTermEntry>,
    pub top_missed_terms_all: Vec<MissedTermEntry>,
    pub top_hallucinated_terms: Vec<HallucinatedTermEntry>,
}

impl TermErrorReport {
    /// Build a report from the final state of an aggregation pass.
    ///
    /// Rankings are capped at `config.top_terms`; the rare ranking keeps
    /// only terms with total ground-truth occurrences below
    /// `config.rarity_threshold`.
    pub fn from_stats(stats: &CorpusAggregator, config: &AnalyzerConfig) -> Self {
        let mut all_missed = stats.missed_ranking();
        let mut rare_missed = stats.rare_missed_ranking(config.rarity_threshold);
        let mut hallucinated = stats.hallucinated_ranking();

        all_missed.truncate(config.top_terms);
        rare_missed.truncate(config.top_terms);
        hallucinated.truncate(config.top_terms);

        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            summary: ReportSummary {
                term_recall: stats.term_recall(),
                total_gt_terms: stats.total_gt_terms(),
                total_missed: stats.total_missed(),
                total_hallucinated: stats.total_hallucinated(),
                samples_analyzed: stats.samples_analyzed(),
            },
            top_missed_terms_rare: rare_missed,
            top_missed_terms_all: all_missed,
            top_hallucinated_terms: hallucinated,
        }
    }
}
