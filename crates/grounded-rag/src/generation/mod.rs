//! Prompt composition, model calls and citation enforcement

pub mod citation;
pub mod gateway;
pub mod prompt;

pub use citation::{citation_token, extract_citations, ResponseValidator};
pub use gateway::GenerationGateway;
pub use prompt::{ComposedPrompt, PromptComposer};
