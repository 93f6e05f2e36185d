//! Lexicon-backed term extraction.
//!
//! The advanced alternative to pattern matching: a newline-delimited
//! vocabulary file of known terms (single words or short phrases) is loaded
//! once, and extraction scans word n-grams against it. Same contract as the
//! pattern extractor, so the two are interchangeable behind
//! [`TermExtractor`](super::TermExtractor).

use super::{TermExtractor, TermSet};
use crate::error::{AnalysisError, Result};
use std::collections::HashSet;
use std::path::Path;

/// Longest phrase length (in words) considered during n-gram scanning.
const MAX_PHRASE_WORDS: usize = 3;

/// Term extractor backed by a vocabulary file.
#[derive(Debug, Clone)]
pub struct LexiconExtractor {
    terms: HashSet<String>,
    max_words: usize,
}

impl LexiconExtractor {
    /// Load a lexicon from a newline-delimited file.
    ///
    /// Entries are trimmed and lowercased; blank lines and `#` comments are
    /// skipped. An unreadable or empty lexicon is an error so the caller
    /// can fall back to pattern extraction.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AnalysisError::LexiconUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let terms: HashSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();

        if terms.is_empty() {
            return Err(AnalysisError::LexiconUnavailable {
                path: path.to_path_buf(),
                reason: "lexicon contains no terms".to_string(),
            });
        }

        let max_words = terms
            .iter()
            .map(|t| t.split_whitespace().count())
            .max()
            .unwrap_or(1)
            .min(MAX_PHRASE_WORDS);

        Ok(Self { terms, max_words })
    }

    /// Build a lexicon directly from an iterator of terms.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: HashSet<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let max_words = terms
            .iter()
            .map(|t| t.split_whitespace().count())
            .max()
            .unwrap_or(1)
            .min(MAX_PHRASE_WORDS);

        Self { terms, max_words }
    }

    /// Number of terms in the lexicon.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl TermExtractor for LexiconExtractor {
    fn extract(&self, text: &str) -> TermSet {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        let mut found = TermSet::new();
        for n in 1..=self.max_words {
            if words.len() < n {
                break;
            }
            for window in words.windows(n) {
                let candidate = window.join(" ");
                if self.terms.contains(&candidate) {
                    found.insert(candidate);
                }
            }
        }
        found
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}
