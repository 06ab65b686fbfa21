//! grounded-rag: question answering over a search index with enforced citations
//!
//! A query flows through retrieval, a confidence guardrail, prompt
//! composition, one model call and citation validation. Every stage can
//! short-circuit with a typed rejection, so callers either get an answer that
//! cites its sources or a well-defined reason why not.

pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, ErrorCategory, Result};
pub use pipeline::AnswerPipeline;
pub use types::{PipelineResult, RejectReason, RetrievedPassage, SourceList};
