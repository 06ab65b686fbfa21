//! Provider abstractions for search and text generation
//!
//! Trait-based seams so the pipeline can run against Azure AI Search with
//! OpenAI or Ollama, or against in-process fakes in tests.

pub mod azure_search;
pub mod llm;
pub mod ollama;
pub mod openai;
pub mod retry;
pub mod search;

use std::sync::Arc;

use crate::config::{GenerationProvider, RagConfig};
use crate::error::Result;

pub use azure_search::AzureSearch;
pub use llm::GenerationBackend;
pub use ollama::OllamaChat;
pub use openai::OpenAiChat;
pub use search::{SearchBackend, SearchHit};

/// Build the configured search and generation backends
pub fn from_config(
    config: &RagConfig,
) -> Result<(Arc<dyn SearchBackend>, Arc<dyn GenerationBackend>)> {
    let search: Arc<dyn SearchBackend> = Arc::new(AzureSearch::new(&config.search)?);

    let llm: Arc<dyn GenerationBackend> = match config.llm.provider {
        GenerationProvider::OpenAi => {
            tracing::info!("Using OpenAI-compatible backend at {}", config.llm.base_url);
            Arc::new(OpenAiChat::new(&config.llm)?)
        }
        GenerationProvider::Ollama => {
            tracing::info!("Using Ollama backend at {}", config.llm.base_url);
            Arc::new(OllamaChat::new(&config.llm)?)
        }
    };

    Ok((search, llm))
}
