//! Core types for the RAG service

pub mod passage;
pub mod query;
pub mod response;
pub mod verdict;

pub use passage::{normalize_source_id, RetrievedPassage, SourceList};
pub use query::QueryRequest;
pub use response::{PipelineResult, QueryResponse, TokenResponse};
pub use verdict::{RejectReason, Validation, Verdict};
