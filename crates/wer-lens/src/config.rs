//! Configuration types for the term error analyzer.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic analyzer setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default rarity threshold: a term is "rare" when its total ground-truth
/// occurrence count across the corpus is below this value.
pub const DEFAULT_RARITY_THRESHOLD: u64 = 100;

/// Default cap on each ranked term list in the report.
pub const DEFAULT_TOP_TERMS: usize = 50;

/// Configuration for the term error analyzer.
///
/// Use [`AnalyzerConfig::builder()`] to create a new configuration
/// with a fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use wer_lens::AnalyzerConfig;
///
/// let config = AnalyzerConfig::builder()
///     .sample_limit(500)
///     .rarity_threshold(100)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Analyze only the first N rows of the corpus (in input order).
    /// If None, all rows are analyzed.
    /// Default: None
    pub sample_limit: Option<usize>,

    /// A missed term is included in the rare ranking only when its total
    /// ground-truth occurrence count is below this threshold.
    /// Default: 100
    pub rarity_threshold: u64,

    /// Cap on each ranked term list in the report.
    /// Default: 50
    pub top_terms: usize,

    /// Whether to attempt lexicon-backed term extraction.
    /// Falls back to pattern-based extraction when the lexicon is
    /// unavailable.
    /// Default: false
    pub use_advanced_extraction: bool,

    /// Path to a newline-delimited term lexicon for advanced extraction.
    /// Default: None
    pub lexicon_path: Option<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_limit: None,
            rarity_threshold: DEFAULT_RARITY_THRESHOLD,
            top_terms: DEFAULT_TOP_TERMS,
            use_advanced_extraction: false,
            lexicon_path: None,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_terms == 0 {
            return Err(ConfigValidationError::InvalidTopTerms(self.top_terms));
        }

        if self.sample_limit == Some(0) {
            return Err(ConfigValidationError::InvalidSampleLimit);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid top_terms: {0} (must be at least 1)")]
    InvalidTopTerms(usize),

    #[error("Invalid sample_limit: 0 (use None to analyze all rows)")]
    InvalidSampleLimit,
}

/// Builder for [`AnalyzerConfig`].
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    /// Analyze only the first N rows of the corpus.
    pub fn sample_limit(mut self, limit: usize) -> Self {
        self.config.sample_limit = Some(limit);
        self
    }

    /// Set the rarity threshold for the rare-missed ranking.
    pub fn rarity_threshold(mut self, threshold: u64) -> Self {
        self.config.rarity_threshold = threshold;
        self
    }

    /// Set the cap on each ranked term list.
    pub fn top_terms(mut self, top_terms: usize) -> Self {
        self.config.top_terms = top_terms;
        self
    }

    /// Enable or disable lexicon-backed extraction.
    pub fn use_advanced_extraction(mut self, enabled: bool) -> Self {
        self.config.use_advanced_extraction = enabled;
        self
    }

    /// Set the lexicon path for advanced extraction.
    pub fn lexicon_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.lexicon_path = Some(path.into());
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<AnalyzerConfig, ConfigValidationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.sample_limit, None);
        assert_eq!(config.rarity_threshold, 100);
        assert_eq!(config.top_terms, 50);
        assert!(!config.use_advanced_extraction);
    }

    #[test]
    fn test_builder() {
        let config = AnalyzerConfig::builder()
            .sample_limit(500)
            .rarity_threshold(50)
            .top_terms(20)
            .build()
            .unwrap();
        assert_eq!(config.sample_limit, Some(500));
        assert_eq!(config.rarity_threshold, 50);
        assert_eq!(config.top_terms, 20);
    }

    #[test]
    fn test_zero_top_terms_rejected() {
        let result = AnalyzerConfig::builder().top_terms(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_sample_limit_rejected() {
        let result = AnalyzerConfig::builder().sample_limit(0).build();
        assert!(result.is_err());
    }
}
