//! Generation gateway: one model call per query

use std::sync::Arc;

use crate::error::Result;
use crate::providers::GenerationBackend;

use super::prompt::ComposedPrompt;

/// Pass-through to the generation backend at a fixed temperature
pub struct GenerationGateway {
    backend: Arc<dyn GenerationBackend>,
    temperature: f32,
}

impl GenerationGateway {
    pub fn new(backend: Arc<dyn GenerationBackend>, temperature: f32) -> Self {
        Self {
            backend,
            temperature,
        }
    }

    /// Run the composed prompt and return raw model text
    pub async fn generate(&self, prompt: &ComposedPrompt) -> Result<String> {
        tracing::debug!(
            "Calling {} ({}) with {} byte prompt",
            self.backend.name(),
            self.backend.model(),
            prompt.system_instruction.len() + prompt.user_message.len()
        );

        self.backend
            .complete(
                &prompt.system_instruction,
                &prompt.user_message,
                self.temperature,
            )
            .await
    }

    pub async fn health_check(&self) -> Result<bool> {
        self.backend.health_check().await
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}
