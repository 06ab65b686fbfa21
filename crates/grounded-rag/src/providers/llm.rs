//! LLM provider trait for generating answers

use async_trait::async_trait;
use crate::error::Result;

/// Trait for chat-style text generation
///
/// Implementations:
/// - `OpenAiChat`: OpenAI-compatible chat completions (gpt-4o-mini, etc.)
/// - `OllamaChat`: Local Ollama server (llama3.2, phi3, etc.)
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Run one completion with a system instruction and a user message
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
        temperature: f32,
    ) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
