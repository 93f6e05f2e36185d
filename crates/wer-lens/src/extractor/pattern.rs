//! Pattern-based term extraction.
//!
//! A heuristic stand-in for real entity recognition: a fixed, ordered,
//! closed list of lexical pattern families (medical suffixes, prefixes,
//! acronyms) evaluated independently, matches unioned into one set. The
//! list over- and under-matches by design.

use super::{TermExtractor, TermSet};
use once_cell::sync::Lazy;
use regex::Regex;

/// The fixed pattern family list: (family name, regex source).
///
/// Suffix and prefix families match case-insensitively. The acronym family
/// is case-sensitive on purpose so ordinary lowercase words of length >= 2
/// do not qualify; "MRI" matches, "patient" does not.
pub const PATTERN_FAMILIES: [(&str, &str); 8] = [
    ("-itis", r"(?i)\b\w*itis\b"),     // inflammation (bronchitis, arthritis)
    ("-osis", r"(?i)\b\w*osis\b"),     // condition (thrombosis, necrosis)
    ("-oma", r"(?i)\b\w*oma\b"),       // tumor (carcinoma, melanoma)
    ("-pathy", r"(?i)\b\w*pathy\b"),   // disease (neuropathy, myopathy)
    ("-emia", r"(?i)\b\w*emia\b"),     // blood condition (anemia, leukemia)
    ("hyper-", r"(?i)\bhyper\w+\b"),   // excessive
    ("hypo-", r"(?i)\bhypo\w+\b"),     // deficient
    ("acronym", r"\b[A-Z]{2,}\b"),     // MRI, CT, COPD
];

static COMPILED_FAMILIES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    PATTERN_FAMILIES
        .iter()
        .map(|(family, source)| {
            let regex = Regex::new(source).expect("pattern family regex is valid");
            (*family, regex)
        })
        .collect()
});

/// Term extractor backed by the fixed pattern family list.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    /// Create a new pattern-based extractor.
    pub fn new() -> Self {
        Self
    }
}

impl TermExtractor for PatternExtractor {
    fn extract(&self, text: &str) -> TermSet {
        let mut terms = TermSet::new();
        for (_, regex) in COMPILED_FAMILIES.iter() {
            for m in regex.find_iter(text) {
                terms.insert(m.as_str().to_lowercase());
            }
        }
        terms
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}
