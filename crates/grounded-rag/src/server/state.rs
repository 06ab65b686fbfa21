//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::pipeline::AnswerPipeline;
use crate::providers::{self, GenerationBackend, SearchBackend};

use super::auth::TokenIssuer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Answer pipeline shared by all requests
    pipeline: AnswerPipeline,
    /// Token issuer (None when auth is disabled)
    token_issuer: Option<TokenIssuer>,
}

impl AppState {
    /// Create state with the backends named in the configuration
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG application state...");
        let (search, llm) = providers::from_config(&config)?;
        Ok(Self::with_backends(config, search, llm))
    }

    /// Create state around explicit backends
    pub fn with_backends(
        config: RagConfig,
        search: Arc<dyn SearchBackend>,
        llm: Arc<dyn GenerationBackend>,
    ) -> Self {
        let pipeline = AnswerPipeline::new(&config, search, llm);
        let token_issuer = config
            .auth
            .enabled
            .then(|| TokenIssuer::from_config(&config.auth));

        let (search_name, llm_name) = pipeline.backend_names();
        tracing::info!(
            "Pipeline ready (search: {}, generation: {}, auth: {})",
            search_name,
            llm_name,
            token_issuer.is_some()
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                token_issuer,
            }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn pipeline(&self) -> &AnswerPipeline {
        &self.inner.pipeline
    }

    pub fn token_issuer(&self) -> Option<&TokenIssuer> {
        self.inner.token_issuer.as_ref()
    }
}
