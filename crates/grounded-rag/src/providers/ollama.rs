//! Ollama chat provider for local answer generation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::llm::GenerationBackend;
use super::retry::{check_status, AttemptError, RetryPolicy};

/// Ollama API client
pub struct OllamaChat {
    client: Client,
    base_url: String,
    model: String,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaChat {
    /// Create a new Ollama client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            retry: RetryPolicy::new(config.max_retries),
        })
    }
}

#[async_trait]
impl GenerationBackend for OllamaChat {
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
        temperature: f32,
    ) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let url = url.as_str();

        tracing::info!("Generating answer with model: {}", self.model);

        self.retry
            .run("Ollama chat", move || async move {
                let request = ChatRequest {
                    model: &self.model,
                    messages: [
                        ChatMessage {
                            role: "system",
                            content: system_instruction,
                        },
                        ChatMessage {
                            role: "user",
                            content: user_message,
                        },
                    ],
                    stream: false,
                    options: ChatOptions { temperature },
                };

                let response = self
                    .client
                    .post(url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| AttemptError::from_send(e, Error::Llm))?;
                let response = check_status(response, Error::Llm).await?;

                let body: ChatResponse = response.json().await.map_err(|e| {
                    AttemptError::permanent(Error::llm(format!(
                        "Failed to parse Ollama response: {}",
                        e
                    )))
                })?;

                Ok(body.message.content)
            })
            .await
    }

    /// Check if Ollama is available
    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
