//! Outcomes of the guardrail and validation steps

use serde::Serialize;
use thiserror::Error;

/// Why a query was rejected instead of answered
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// Retrieval returned fewer passages than required
    #[error("retrieval returned {found} passage(s), at least {required} required")]
    TooFewPassages { found: usize, required: usize },

    /// The top-ranked passage scored below the confidence threshold
    #[error("top passage score {top_score:.3} is below the minimum {min_score:.3}")]
    LowConfidence { top_score: f32, min_score: f32 },

    /// The model answered with the refusal token
    #[error("the model declined to answer from the supplied context")]
    ModelDeclined,

    /// No citation could be established for the answer
    #[error("the answer does not cite any available source")]
    MissingCitations,
}

/// Guardrail decision before generation
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Enough confident context to proceed
    Pass,
    /// Stop before calling the model
    Reject(RejectReason),
}

/// Validator decision after generation
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Answer is cited (possibly after appending the source suffix)
    Accepted {
        answer: String,
        /// True when the citation suffix was synthesized
        repaired: bool,
    },
    /// Answer must not reach the caller
    Rejected(RejectReason),
}
