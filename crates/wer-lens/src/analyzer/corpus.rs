//! Corpus-level accumulation of term errors.

use crate::analyzer::row::{RowAnalysis, analyze_row};
use crate::error::{AnalysisError, Result};
use crate::extractor::TermExtractor;
use crate::progress::{AnalysisStage, ProgressReporter, ProgressUpdate};
use crate::reporting::{HallucinatedTermEntry, MissedTermEntry};
use polars::prelude::*;
use std::collections::HashMap;

/// Progress is reported once per this many rows, plus on the final row.
const PROGRESS_INTERVAL: usize = 50;

/// Accumulates per-term counters and scalar totals across a corpus.
///
/// Counters are owned exclusively by the single aggregation pass that
/// builds them and are read-only afterward. Accumulation is commutative
/// and associative, so partial aggregators built over row partitions can
/// be [`merge`](Self::merge)d with bit-identical final totals.
#[derive(Debug, Clone, Default)]
pub struct CorpusAggregator {
    missed_counts: HashMap<String, u64>,
    hallucinated_counts: HashMap<String, u64>,
    gt_term_counts: HashMap<String, u64>,
    total_gt_terms: u64,
    total_missed: u64,
    total_hallucinated: u64,
    samples_analyzed: usize,
}

impl CorpusAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one row's analysis.
    ///
    /// Term sets are per-row, so a term counts at most once per row it
    /// appears in.
    pub fn observe(&mut self, analysis: &RowAnalysis) {
        for term in &analysis.missed {
            *self.missed_counts.entry(term.clone()).or_insert(0) += 1;
        }
        for term in &analysis.added {
            *self.hallucinated_counts.entry(term.clone()).or_insert(0) += 1;
        }
        for term in &analysis.gt_terms {
            *self.gt_term_counts.entry(term.clone()).or_insert(0) += 1;
        }

        self.total_gt_terms += analysis.gt_terms.len() as u64;
        self.total_missed += analysis.missed.len() as u64;
        self.total_hallucinated += analysis.added.len() as u64;
        self.samples_analyzed += 1;
    }

    /// Fold another aggregator into this one.
    ///
    /// Counter addition is commutative, so merge order never changes the
    /// final totals.
    pub fn merge(&mut self, other: CorpusAggregator) {
        for (term, count) in other.missed_counts {
            *self.missed_counts.entry(term).or_insert(0) += count;
        }
        for (term, count) in other.hallucinated_counts {
            *self.hallucinated_counts.entry(term).or_insert(0) += count;
        }
        for (term, count) in other.gt_term_counts {
            *self.gt_term_counts.entry(term).or_insert(0) += count;
        }

        self.total_gt_terms += other.total_gt_terms;
        self.total_missed += other.total_missed;
        self.total_hallucinated += other.total_hallucinated;
        self.samples_analyzed += other.samples_analyzed;
    }

    /// Analyze a DataFrame corpus row by row, in input order.
    ///
    /// Requires `pred_text` and `gt_text` columns; a missing column is a
    /// fatal [`AnalysisError::ColumnNotFound`]. Null cells are treated as
    /// empty text. When `sample_limit` is set, only the first N rows are
    /// analyzed. Zero rows is not an error.
    pub fn analyze_frame(
        df: &DataFrame,
        extractor: &dyn TermExtractor,
        sample_limit: Option<usize>,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<Self> {
        let pred_series = text_column(df, "pred_text")?;
        let gt_series = text_column(df, "gt_text")?;
        let pred = pred_series.str()?;
        let gt = gt_series.str()?;

        let total = match sample_limit {
            Some(limit) => limit.min(df.height()),
            None => df.height(),
        };

        let mut aggregator = Self::new();
        for (i, (pred_text, gt_text)) in pred.into_iter().zip(gt).take(total).enumerate() {
            let analysis = analyze_row(extractor, pred_text.unwrap_or(""), gt_text.unwrap_or(""));
            aggregator.observe(&analysis);

            if let Some(reporter) = progress
                && (i % PROGRESS_INTERVAL == 0 || i + 1 == total)
            {
                reporter.report(ProgressUpdate::with_rows(
                    AnalysisStage::RowAnalysis,
                    i + 1,
                    total,
                    format!("Analyzed {}/{} rows", i + 1, total),
                ));
            }
        }

        Ok(aggregator)
    }

    /// Term-level recall: fraction of ground-truth term occurrences that
    /// were not missed. Exactly 0.0 when no ground-truth terms were seen.
    pub fn term_recall(&self) -> f64 {
        if self.total_gt_terms == 0 {
            0.0
        } else {
            (self.total_gt_terms - self.total_missed) as f64 / self.total_gt_terms as f64
        }
    }

    pub fn total_gt_terms(&self) -> u64 {
        self.total_gt_terms
    }

    pub fn total_missed(&self) -> u64 {
        self.total_missed
    }

    pub fn total_hallucinated(&self) -> u64 {
        self.total_hallucinated
    }

    pub fn samples_analyzed(&self) -> usize {
        self.samples_analyzed
    }

    /// Number of distinct missed terms (the true length behind the capped
    /// all-missed ranking).
    pub fn unique_missed_terms(&self) -> usize {
        self.missed_counts.len()
    }

    /// Number of distinct hallucinated terms.
    pub fn unique_hallucinated_terms(&self) -> usize {
        self.hallucinated_counts.len()
    }

    /// Total ground-truth occurrences of one term across the corpus.
    pub fn gt_occurrences(&self, term: &str) -> u64 {
        self.gt_term_counts.get(term).copied().unwrap_or(0)
    }

    /// Full missed-term ranking: descending missed-count, ties broken by
    /// ascending term for a total, deterministic order.
    pub fn missed_ranking(&self) -> Vec<MissedTermEntry> {
        let mut entries: Vec<MissedTermEntry> = self
            .missed_counts
            .iter()
            .map(|(term, &missed_count)| {
                let total_occurrences = self.gt_occurrences(term);
                MissedTermEntry {
                    term: term.clone(),
                    missed_count,
                    total_occurrences,
                    miss_rate: missed_count as f64 / total_occurrences.max(1) as f64,
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.missed_count
                .cmp(&a.missed_count)
                .then_with(|| a.term.cmp(&b.term))
        });
        entries
    }

    /// Missed-term ranking restricted to rare terms: total ground-truth
    /// occurrences below `threshold`.
    pub fn rare_missed_ranking(&self, threshold: u64) -> Vec<MissedTermEntry> {
        self.missed_ranking()
            .into_iter()
            .filter(|entry| entry.total_occurrences < threshold)
            .collect()
    }

    /// Full hallucinated-term ranking: descending count, ties broken by
    /// ascending term.
    pub fn hallucinated_ranking(&self) -> Vec<HallucinatedTermEntry> {
        let mut entries: Vec<HallucinatedTermEntry> = self
            .hallucinated_counts
            .iter()
            .map(|(term, &count)| HallucinatedTermEntry {
                term: term.clone(),
                count,
            })
            .collect();

        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        entries
    }
}

fn text_column(df: &DataFrame, name: &str) -> Result<Series> {
    let column = df
        .column(name)
        .map_err(|_| AnalysisError::ColumnNotFound(name.to_string()))?;
    Ok(column.as_materialized_series().cast(&DataType::String)?)
}
