//! Merging of train/validation/test split files.
//!
//! Each split is tagged with its origin under a new `split` column, then
//! the splits are concatenated in train-val-test order into one combined
//! delimited file.

use crate::error::{AnalysisError, Result, ResultExt};
use crate::utils::load_csv;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the provenance column added during merging.
pub const SPLIT_COLUMN: &str = "split";

/// Row counts and output location for a completed merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub train_rows: usize,
    pub val_rows: usize,
    pub test_rows: usize,
    pub output: PathBuf,
}

impl MergeSummary {
    /// Total rows in the merged dataset.
    pub fn total_rows(&self) -> usize {
        self.train_rows + self.val_rows + self.test_rows
    }
}

/// Tag each frame with its split label and concatenate in the given order.
///
/// All frames must share a schema; the `split` column is appended to each
/// before stacking.
pub fn tag_and_concat(frames: Vec<(DataFrame, &str)>) -> Result<DataFrame> {
    let mut tagged = Vec::with_capacity(frames.len());
    for (mut df, label) in frames {
        let height = df.height();
        df.with_column(Series::new(SPLIT_COLUMN.into(), vec![label; height]))?;
        tagged.push(df);
    }

    let mut iter = tagged.into_iter();
    let mut merged = iter
        .next()
        .ok_or_else(|| AnalysisError::InvalidConfig("no frames to merge".to_string()))?;
    for df in iter {
        merged.vstack_mut(&df)?;
    }

    Ok(merged)
}

/// Merge train, validation and test split files into one combined CSV.
pub fn merge_splits(
    train: &Path,
    val: &Path,
    test: &Path,
    output: &Path,
) -> Result<MergeSummary> {
    info!("Merging split files...");

    let train_df = load_csv(train)?;
    let val_df = load_csv(val)?;
    let test_df = load_csv(test)?;

    let summary = MergeSummary {
        train_rows: train_df.height(),
        val_rows: val_df.height(),
        test_rows: test_df.height(),
        output: output.to_path_buf(),
    };

    let mut merged = tag_and_concat(vec![
        (train_df, "train"),
        (val_df, "val"),
        (test_df, "test"),
    ])?;

    let mut file = File::create(output)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut merged)
        .context(format!("Failed to write merged CSV to {}", output.display()))?;

    info!(
        "Merged {} rows (train: {}, val: {}, test: {}) into {}",
        summary.total_rows(),
        summary.train_rows,
        summary.val_rows,
        summary.test_rows,
        output.display()
    );

    Ok(summary)
}
