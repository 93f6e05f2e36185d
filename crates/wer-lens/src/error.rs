//! Custom error types for the WER analysis toolkit.
//!
//! This module provides the error hierarchy using `thiserror`. All failures
//! surface to the top-level invocation; the only non-fatal conditions
//! (missing dashboard columns, degenerate corpora) are handled in place and
//! never become errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the analysis toolkit.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Required input file is absent.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Term lexicon could not be loaded for advanced extraction.
    #[error("Failed to load term lexicon from '{path}': {reason}")]
    LexiconUnavailable { path: PathBuf, reason: String },

    /// Report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AnalysisError::ColumnNotFound("pred_text".to_string());
        assert_eq!(err.to_string(), "Column 'pred_text' not found in dataset");

        let err = AnalysisError::InputNotFound(PathBuf::from("data.csv"));
        assert!(err.to_string().contains("data.csv"));
    }

    #[test]
    fn test_with_context() {
        let err = AnalysisError::ColumnNotFound("gt_text".to_string())
            .with_context("During term analysis");
        assert!(err.to_string().contains("During term analysis"));
        assert!(err.to_string().contains("gt_text"));
    }

    #[test]
    fn test_result_ext_on_polars_result() {
        let res: std::result::Result<(), polars::error::PolarsError> = Err(
            polars::error::PolarsError::ComputeError("boom".into()),
        );
        let err = res.context("While reshaping").unwrap_err();
        assert!(err.to_string().contains("While reshaping"));
    }
}
