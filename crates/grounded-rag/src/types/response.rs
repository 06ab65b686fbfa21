//! Response types for RAG queries

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::passage::SourceList;

/// Successful pipeline outcome: a cited answer plus the sources it may cite
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Query ID used in log lines for this run
    pub query_id: Uuid,
    /// Final answer text
    pub answer: String,
    /// Citable sources, first-occurrence order
    pub sources: SourceList,
    /// True when the citation suffix was appended by the validator
    pub citations_repaired: bool,
    /// Number of passages the search backend returned
    pub passages_retrieved: usize,
    /// Effective score of the top passage
    pub top_score: f32,
}

impl PipelineResult {
    /// Split into the `(answer, sources)` pair
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.answer, self.sources.into_vec())
    }
}

/// Response from `POST /api/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Subject of the bearer token (if auth is enabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Grounded answer
    pub answer: String,
    /// Source identifiers the answer draws on
    pub sources: Vec<String>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl QueryResponse {
    /// Build the HTTP response from a pipeline result
    pub fn from_result(
        result: PipelineResult,
        user: Option<String>,
        processing_time_ms: u64,
    ) -> Self {
        let (answer, sources) = result.into_parts();
        Self {
            user,
            answer,
            sources,
            processing_time_ms,
        }
    }
}

/// Response from `POST /token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
