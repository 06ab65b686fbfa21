//! Retrieval and pre-generation guardrails

pub mod gateway;
pub mod guardrail;

pub use gateway::RetrievalGateway;
pub use guardrail::GuardrailEvaluator;
