//! Candidate term extraction from free text.
//!
//! Two implementations of the same contract live here: the default
//! [`PatternExtractor`] built from a fixed list of lexical pattern families,
//! and the lexicon-backed [`LexiconExtractor`] for corpora that ship a
//! vocabulary file. [`resolve_extractor`] picks one at startup and the
//! choice is never re-checked per call.

mod lexicon;
mod pattern;

pub use lexicon::LexiconExtractor;
pub use pattern::{PATTERN_FAMILIES, PatternExtractor};

use crate::config::AnalyzerConfig;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// A set of candidate terms extracted from one text field.
///
/// Terms are lowercase; equality is exact string match. The ordered set
/// gives deterministic enumeration, but callers must not rely on extraction
/// order for semantics.
pub type TermSet = BTreeSet<String>;

/// Extracts candidate vocabulary terms from free text.
///
/// Implementations are pure functions of the input text: no side effects,
/// duplicates collapsed, every term lowercased. Empty or unmatched input
/// yields an empty set, and arbitrary unicode/punctuation never panics.
pub trait TermExtractor: Send + Sync {
    /// Produce the set of candidate terms found in `text`.
    fn extract(&self, text: &str) -> TermSet;

    /// Short identifier for logs and report metadata.
    fn name(&self) -> &'static str;
}

/// Resolve the extractor to use for a run.
///
/// Capability detection happens exactly once, here: when advanced
/// extraction is requested and the lexicon loads, the lexicon extractor is
/// used; any failure falls back transparently to pattern extraction with a
/// warning. The result is passed explicitly to the analyzer rather than
/// consulted through global state.
pub fn resolve_extractor(config: &AnalyzerConfig) -> Box<dyn TermExtractor> {
    if config.use_advanced_extraction {
        match &config.lexicon_path {
            Some(path) => match LexiconExtractor::from_file(path) {
                Ok(extractor) => {
                    info!(
                        "Using lexicon-backed extraction ({} terms)",
                        extractor.len()
                    );
                    return Box::new(extractor);
                }
                Err(e) => {
                    warn!("Lexicon unavailable: {}. Using pattern-based extraction.", e);
                }
            },
            None => {
                warn!("Advanced extraction requested without a lexicon path. Using pattern-based extraction.");
            }
        }
    }

    Box::new(PatternExtractor::new())
}
