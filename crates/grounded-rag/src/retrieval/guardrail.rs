//! Pre-generation checks on retrieved passages

use crate::config::GuardrailConfig;
use crate::types::{RejectReason, RetrievedPassage, Verdict};

/// Decides whether retrieval produced enough confident context to call the model
#[derive(Debug, Clone)]
pub struct GuardrailEvaluator {
    min_docs: usize,
    min_score: f32,
}

impl GuardrailEvaluator {
    pub fn new(min_docs: usize, min_score: f32) -> Self {
        Self { min_docs, min_score }
    }

    pub fn from_config(config: &GuardrailConfig) -> Self {
        Self::new(config.min_docs, config.min_score)
    }

    /// Apply the rules in order; the first failing rule wins.
    ///
    /// Only the top-ranked passage is scored.
    pub fn check(&self, passages: &[RetrievedPassage]) -> Verdict {
        if passages.len() < self.min_docs {
            return Verdict::Reject(RejectReason::TooFewPassages {
                found: passages.len(),
                required: self.min_docs,
            });
        }

        if let Some(top) = passages.first() {
            let top_score = top.effective_score();
            if top_score < self.min_score {
                return Verdict::Reject(RejectReason::LowConfidence {
                    top_score,
                    min_score: self.min_score,
                });
            }
        }

        Verdict::Pass
    }
}

impl Default for GuardrailEvaluator {
    fn default() -> Self {
        Self::from_config(&GuardrailConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(scores: &[Option<f32>]) -> Vec<RetrievedPassage> {
        scores
            .iter()
            .map(|s| RetrievedPassage::new("text", Some("doc.txt".to_string()), *s))
            .collect()
    }

    #[test]
    fn test_empty_is_rejected() {
        let verdict = GuardrailEvaluator::default().check(&[]);
        assert_eq!(
            verdict,
            Verdict::Reject(RejectReason::TooFewPassages { found: 0, required: 1 })
        );
    }

    #[test]
    fn test_low_top_score_is_rejected() {
        let verdict = GuardrailEvaluator::default().check(&scored(&[Some(0.1)]));
        assert!(matches!(
            verdict,
            Verdict::Reject(RejectReason::LowConfidence { .. })
        ));
    }

    #[test]
    fn test_only_top_passage_is_scored() {
        let guard = GuardrailEvaluator::default();
        // A strong tail does not rescue a weak head
        assert!(matches!(
            guard.check(&scored(&[Some(0.2), Some(0.99), Some(0.99)])),
            Verdict::Reject(RejectReason::LowConfidence { .. })
        ));
        // A weak tail does not sink a strong head
        assert_eq!(guard.check(&scored(&[Some(0.9), Some(0.01)])), Verdict::Pass);
    }

    #[test]
    fn test_missing_score_counts_as_confident() {
        assert_eq!(GuardrailEvaluator::default().check(&scored(&[None])), Verdict::Pass);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(GuardrailEvaluator::new(1, 0.35).check(&scored(&[Some(0.35)])), Verdict::Pass);
    }

    #[test]
    fn test_count_rule_runs_before_score_rule() {
        let verdict = GuardrailEvaluator::new(3, 0.35).check(&scored(&[Some(0.01), Some(0.01)]));
        assert_eq!(
            verdict,
            Verdict::Reject(RejectReason::TooFewPassages { found: 2, required: 3 })
        );
    }
}
