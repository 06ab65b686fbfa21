//! Retrieved passages and the source lists derived from them

use serde::{Deserialize, Serialize};

/// A chunk of source text returned by the search backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Text body of the chunk
    pub content: String,
    /// Originating document (filename or index key), resolved at the gateway
    pub source_id: Option<String>,
    /// Backend relevance score (scale is backend-specific)
    pub score: Option<f32>,
}

impl RetrievedPassage {
    /// Create a passage
    pub fn new(content: impl Into<String>, source_id: Option<String>, score: Option<f32>) -> Self {
        Self {
            content: content.into(),
            source_id,
            score,
        }
    }

    /// Score used by the confidence check. Missing scores count as full confidence.
    pub fn effective_score(&self) -> f32 {
        self.score.unwrap_or(1.0)
    }
}

/// Reduce a source identifier to its final path segment.
///
/// Returns `None` when nothing citable is left.
pub fn normalize_source_id(raw: &str) -> Option<String> {
    let segment = raw
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

/// Ordered, de-duplicated list of citable source identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceList(Vec<String>);

impl SourceList {
    /// Derive the source list from passages, keeping first-occurrence order
    pub fn from_passages(passages: &[RetrievedPassage]) -> Self {
        let mut sources: Vec<String> = Vec::with_capacity(passages.len());

        for passage in passages {
            let Some(id) = passage.source_id.as_deref().and_then(normalize_source_id) else {
                continue;
            };
            if !sources.contains(&id) {
                sources.push(id);
            }
        }

        Self(sources)
    }

    /// Check whether `id` is citable
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|s| s == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}
