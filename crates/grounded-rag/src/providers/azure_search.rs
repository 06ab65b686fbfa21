//! Azure AI Search client for passage retrieval

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::{Error, Result};

use super::retry::{check_status, AttemptError, RetryPolicy};
use super::search::{SearchBackend, SearchHit};

/// Azure AI Search REST client
pub struct AzureSearch {
    client: Client,
    endpoint: String,
    index: String,
    api_version: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    search: &'a str,
    top: usize,
    select: &'static str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<SearchDocument>,
}

#[derive(Deserialize)]
struct SearchDocument {
    #[serde(rename = "@search.score")]
    score: Option<f32>,
    id: Option<String>,
    #[serde(default)]
    content: Option<String>,
    source: Option<String>,
}

impl From<SearchDocument> for SearchHit {
    fn from(doc: SearchDocument) -> Self {
        SearchHit {
            content: doc.content.unwrap_or_default(),
            source: doc.source,
            key: doc.id,
            score: doc.score,
        }
    }
}

impl AzureSearch {
    /// Create a new Azure AI Search client
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            api_version: config.api_version.clone(),
            api_key: config.api_key.clone(),
            retry: RetryPolicy::new(config.max_retries),
        })
    }

    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.index, self.api_version
        )
    }

    fn index_url(&self) -> String {
        format!(
            "{}/indexes/{}?api-version={}",
            self.endpoint, self.index, self.api_version
        )
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("api-key", key),
            None => request,
        }
    }
}

#[async_trait]
impl SearchBackend for AzureSearch {
    async fn search(&self, query: &str, top: usize) -> Result<Vec<SearchHit>> {
        let url = self.search_url();
        let url = url.as_str();

        let hits = self
            .retry
            .run("Azure search", move || async move {
                let request = self.with_key(self.client.post(url)).json(&SearchRequest {
                    search: query,
                    top,
                    select: "id,content,source",
                });

                let response = request
                    .send()
                    .await
                    .map_err(|e| AttemptError::from_send(e, Error::Search))?;
                let response = check_status(response, Error::Search).await?;

                let body: SearchResponse = response.json().await.map_err(|e| {
                    AttemptError::permanent(Error::search(format!(
                        "Failed to parse search response: {}",
                        e
                    )))
                })?;

                Ok(body.value)
            })
            .await?;

        tracing::debug!("Azure search returned {} hits", hits.len());
        Ok(hits.into_iter().map(SearchHit::from).collect())
    }

    async fn health_check(&self) -> Result<bool> {
        match self.with_key(self.client.get(self.index_url())).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "azure-search"
    }
}
