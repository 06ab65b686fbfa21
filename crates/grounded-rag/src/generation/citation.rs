//! Citation enforcement on model output

use regex::Regex;
use std::sync::OnceLock;

use crate::types::{RejectReason, SourceList, Validation};

/// Inline citation marker for a source id
pub fn citation_token(source_id: &str) -> String {
    format!("[source:{}]", source_id)
}

/// True if `text` cites at least one member of `sources` exactly
pub fn has_citation(text: &str, sources: &SourceList) -> bool {
    sources.iter().any(|s| text.contains(&citation_token(s)))
}

/// Suffix listing every source as a citation marker
pub fn citation_suffix(sources: &SourceList) -> String {
    let tokens: Vec<String> = sources.iter().map(citation_token).collect();
    format!("\n\nSources: {}", tokens.join(" "))
}

/// Extract every id cited in `text`, in order of appearance
pub fn extract_citations(text: &str) -> Vec<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"\[source:\s*([^\]]+?)\s*\]").expect("citation pattern is valid")
    });

    pattern
        .captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Checks model output for refusal and citations, repairing missing citations
#[derive(Debug, Clone)]
pub struct ResponseValidator {
    refusal_token: String,
}

impl ResponseValidator {
    pub fn new(refusal_token: impl Into<String>) -> Self {
        Self {
            refusal_token: refusal_token.into(),
        }
    }

    /// True if the (trimmed) answer starts with the refusal token, ignoring case
    pub fn is_refusal(&self, text: &str) -> bool {
        text.trim()
            .to_lowercase()
            .starts_with(&self.refusal_token.to_lowercase())
    }

    /// Validate raw model output against the citable sources.
    ///
    /// Uncited answers get every source appended; answers that stay uncited
    /// (no sources at all) are rejected.
    pub fn validate(&self, raw: &str, sources: &SourceList) -> Validation {
        let text = raw.trim();

        if self.is_refusal(text) {
            return Validation::Rejected(RejectReason::ModelDeclined);
        }

        self.warn_on_unknown_citations(text, sources);

        if has_citation(text, sources) {
            return Validation::Accepted {
                answer: text.to_string(),
                repaired: false,
            };
        }

        let mut answer = text.to_string();
        if !sources.is_empty() {
            answer.push_str(&citation_suffix(sources));
        }

        if has_citation(&answer, sources) {
            tracing::debug!("Appended citation suffix for {} source(s)", sources.len());
            Validation::Accepted {
                answer,
                repaired: true,
            }
        } else {
            Validation::Rejected(RejectReason::MissingCitations)
        }
    }

    fn warn_on_unknown_citations(&self, text: &str, sources: &SourceList) {
        let unknown: Vec<String> = extract_citations(text)
            .into_iter()
            .filter(|id| !sources.contains(id))
            .collect();
        if !unknown.is_empty() {
            tracing::warn!("Model cited sources it was not given: {:?}", unknown);
        }
    }
}

impl Default for ResponseValidator {
    fn default() -> Self {
        Self::new("NOCONTEXT")
    }
}
