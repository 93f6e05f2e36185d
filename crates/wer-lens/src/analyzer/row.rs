//! Row-level term error analysis.

use crate::extractor::{TermExtractor, TermSet};

/// Term-set partitions for one (predicted, ground-truth) text pair.
///
/// `missed`, `added` and `correct` are pairwise disjoint;
/// `correct ∪ missed` equals `gt_terms` and `correct ∪ added` equals
/// `pred_terms`. Presence/absence only: no word alignment is performed, so
/// genuine term-to-term substitutions are not reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAnalysis {
    /// Terms in ground truth but absent from the prediction.
    pub missed: TermSet,
    /// Terms in the prediction but absent from ground truth.
    pub added: TermSet,
    /// Terms present on both sides.
    pub correct: TermSet,
    /// All terms extracted from the ground-truth text.
    pub gt_terms: TermSet,
    /// All terms extracted from the predicted text.
    pub pred_terms: TermSet,
}

/// Compare predicted and ground-truth text to find term-level errors.
///
/// Pure function of the two texts and the extractor; deterministic given
/// the same extractor behavior.
pub fn analyze_row(extractor: &dyn TermExtractor, pred_text: &str, gt_text: &str) -> RowAnalysis {
    let pred_terms = extractor.extract(pred_text);
    let gt_terms = extractor.extract(gt_text);

    let missed: TermSet = gt_terms.difference(&pred_terms).cloned().collect();
    let added: TermSet = pred_terms.difference(&gt_terms).cloned().collect();
    let correct: TermSet = pred_terms.intersection(&gt_terms).cloned().collect();

    RowAnalysis {
        missed,
        added,
        correct,
        gt_terms,
        pred_terms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::PatternExtractor;
    use pretty_assertions::assert_eq;

    fn analyze(pred: &str, gt: &str) -> RowAnalysis {
        analyze_row(&PatternExtractor::new(), pred, gt)
    }

    #[test]
    fn test_missed_and_added() {
        let analysis = analyze(
            "patient has bronchitis and hypertension",
            "patient has arthritis and hypertension",
        );
        assert_eq!(
            analysis.missed.iter().collect::<Vec<_>>(),
            vec!["arthritis"]
        );
        assert_eq!(
            analysis.added.iter().collect::<Vec<_>>(),
            vec!["bronchitis"]
        );
        assert_eq!(
            analysis.correct.iter().collect::<Vec<_>>(),
            vec!["hypertension"]
        );
    }

    #[test]
    fn test_disjointness_and_cover_invariants() {
        let analysis = analyze(
            "MRI shows melanoma and anemia",
            "CT shows melanoma and neuropathy",
        );

        assert!(analysis.missed.is_disjoint(&analysis.correct));
        assert!(analysis.added.is_disjoint(&analysis.correct));
        assert!(analysis.missed.is_disjoint(&analysis.added));

        let gt_cover: TermSet = analysis.missed.union(&analysis.correct).cloned().collect();
        assert_eq!(gt_cover, analysis.gt_terms);

        let pred_cover: TermSet = analysis.added.union(&analysis.correct).cloned().collect();
        assert_eq!(pred_cover, analysis.pred_terms);
    }

    #[test]
    fn test_terms_outside_pattern_families_ignored() {
        let analysis = analyze("patient has bronchitis", "patient has pneumonia and bronchitis");
        // "pneumonia" matches no pattern family, so the only gt term is
        // "bronchitis" and nothing is missed.
        assert_eq!(
            analysis.gt_terms.iter().collect::<Vec<_>>(),
            vec!["bronchitis"]
        );
        assert!(analysis.missed.is_empty());
        assert!(analysis.added.is_empty());
    }

    #[test]
    fn test_empty_texts() {
        let analysis = analyze("", "");
        assert!(analysis.missed.is_empty());
        assert!(analysis.added.is_empty());
        assert!(analysis.correct.is_empty());
    }
}
