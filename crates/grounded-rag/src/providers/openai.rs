//! OpenAI-compatible chat completions client
//!
//! Works against api.openai.com and any endpoint exposing `/chat/completions`
//! in the same format.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::llm::GenerationBackend;
use super::retry::{check_status, AttemptError, RetryPolicy};

/// Chat completions client
pub struct OpenAiChat {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

impl OpenAiChat {
    /// Create a new chat client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            retry: RetryPolicy::new(config.max_retries),
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiChat {
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
        temperature: f32,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let url = url.as_str();

        tracing::info!("Generating answer with model: {}", self.model);

        self.retry
            .run("Chat completion", move || async move {
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
                    temperature,
                };

                let response = self
                    .authorized(self.client.post(url))
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| AttemptError::from_send(e, Error::Llm))?;
                let response = check_status(response, Error::Llm).await?;

                let body: ChatResponse = response.json().await.map_err(|e| {
                    AttemptError::permanent(Error::llm(format!(
                        "Failed to parse chat response: {}",
                        e
                    )))
                })?;

                body.into_text().ok_or_else(|| {
                    AttemptError::permanent(Error::llm("No message content in chat response"))
                })
            })
            .await
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.base_url);
        match self.authorized(self.client.get(&url)).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
