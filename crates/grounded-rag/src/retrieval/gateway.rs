//! Retrieval gateway: search backend hits to passages

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{SearchBackend, SearchHit};
use crate::types::RetrievedPassage;

/// Wraps a search backend and normalizes its hits into passages
pub struct RetrievalGateway {
    backend: Arc<dyn SearchBackend>,
    fetch_limit: usize,
}

impl RetrievalGateway {
    /// Create a gateway that asks the backend for `fetch_limit` hits per query
    pub fn new(backend: Arc<dyn SearchBackend>, fetch_limit: usize) -> Self {
        Self {
            backend,
            fetch_limit,
        }
    }

    /// Retrieve passages for a query, most relevant first.
    ///
    /// No hits is an empty vector. Backend failures propagate unchanged.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedPassage>> {
        let hits = self.backend.search(query, self.fetch_limit).await?;

        tracing::debug!(
            "{} returned {} hits for query",
            self.backend.name(),
            hits.len()
        );

        Ok(hits.into_iter().map(to_passage).collect())
    }

    /// Check the backend
    pub async fn health_check(&self) -> Result<bool> {
        self.backend.health_check().await
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

/// Resolve the source of a hit: `source` metadata, then the index key
fn to_passage(hit: SearchHit) -> RetrievedPassage {
    let source_id = non_blank(hit.source).or_else(|| non_blank(hit.key));
    RetrievedPassage {
        content: hit.content,
        source_id,
        score: hit.score,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
