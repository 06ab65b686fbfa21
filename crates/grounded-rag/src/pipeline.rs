//! Answer pipeline: retrieval, guardrails, generation, citation enforcement

use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::{GenerationGateway, PromptComposer, ResponseValidator};
use crate::providers::{GenerationBackend, SearchBackend};
use crate::retrieval::{GuardrailEvaluator, RetrievalGateway};
use crate::types::{PipelineResult, SourceList, Validation, Verdict};

/// Composes the stages into a single all-or-nothing `answer` call.
///
/// Holds no per-query state; share it behind an `Arc` and call it from as
/// many tasks as needed.
pub struct AnswerPipeline {
    retrieval: RetrievalGateway,
    guardrail: GuardrailEvaluator,
    composer: PromptComposer,
    generation: GenerationGateway,
    validator: ResponseValidator,
    top_k: usize,
}

impl AnswerPipeline {
    /// Build a pipeline from configuration and backends
    pub fn new(
        config: &RagConfig,
        search: Arc<dyn SearchBackend>,
        llm: Arc<dyn GenerationBackend>,
    ) -> Self {
        let g = &config.guardrail;
        let fetch_limit = config.search.fetch_limit.max(g.top_k);

        Self {
            retrieval: RetrievalGateway::new(search, fetch_limit),
            guardrail: GuardrailEvaluator::from_config(g),
            composer: PromptComposer::new(g.refusal_token.clone()),
            generation: GenerationGateway::new(llm, config.llm.temperature),
            validator: ResponseValidator::new(g.refusal_token.clone()),
            top_k: g.top_k,
        }
    }

    /// Answer a question with cited sources or a typed rejection
    pub async fn answer(&self, query: &str) -> Result<PipelineResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidQuery("question must not be empty".to_string()));
        }

        let query_id = Uuid::new_v4();
        let start = Instant::now();
        tracing::info!(%query_id, "Query: \"{}\"", query);

        let passages = self.retrieval.retrieve(query).await?;
        let passages_retrieved = passages.len();

        if let Verdict::Reject(reason) = self.guardrail.check(&passages) {
            tracing::warn!(%query_id, "Guardrail rejected query: {}", reason);
            return Err(reason.into());
        }

        let top_score = passages
            .first()
            .map(|p| p.effective_score())
            .unwrap_or_default();
        let grounded = &passages[..passages.len().min(self.top_k)];
        let sources = SourceList::from_passages(grounded);

        let prompt = self.composer.compose(query, grounded, &sources);
        let raw = self.generation.generate(&prompt).await?;

        match self.validator.validate(&raw, &sources) {
            Validation::Accepted { answer, repaired } => {
                tracing::info!(
                    %query_id,
                    "Query completed in {}ms, {} source(s){}",
                    start.elapsed().as_millis(),
                    sources.len(),
                    if repaired { ", citations appended" } else { "" }
                );
                Ok(PipelineResult {
                    query_id,
                    answer,
                    sources,
                    citations_repaired: repaired,
                    passages_retrieved,
                    top_score,
                })
            }
            Validation::Rejected(reason) => {
                tracing::warn!(%query_id, "Answer rejected: {}", reason);
                Err(reason.into())
            }
        }
    }

    /// Health of both backends as `(search, generation)`
    pub async fn health(&self) -> (bool, bool) {
        let (search, llm) = tokio::join!(
            self.retrieval.health_check(),
            self.generation.health_check()
        );
        (search.unwrap_or(false), llm.unwrap_or(false))
    }

    /// Backend names as `(search, generation)`
    pub fn backend_names(&self) -> (&str, &str) {
        (self.retrieval.backend_name(), self.generation.backend_name())
    }
}
