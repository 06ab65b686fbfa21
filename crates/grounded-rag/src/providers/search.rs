//! Search backend trait for passage retrieval

use async_trait::async_trait;
use crate::error::Result;

/// Raw hit as reported by a search backend
///
/// Backends fill whatever metadata they have; the retrieval gateway decides
/// which field becomes the passage's source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHit {
    /// Chunk text
    pub content: String,
    /// `source` metadata field (usually the original filename)
    pub source: Option<String>,
    /// Document key in the index
    pub key: Option<String>,
    /// Relevance score, if the backend reports one
    pub score: Option<f32>,
}

/// Trait for full-text / vector search over the document index
///
/// Implementations:
/// - `AzureSearch`: Azure AI Search REST API
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Search for passages, most relevant first.
    ///
    /// Zero hits is `Ok(vec![])`, never an error.
    async fn search(&self, query: &str, top: usize) -> Result<Vec<SearchHit>>;

    /// Check if the backend is reachable and authorized
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
