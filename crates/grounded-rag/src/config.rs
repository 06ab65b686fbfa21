//! Configuration for the RAG service

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Token auth configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Search backend configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Generation backend configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Retrieval and answer guardrails
    #[serde(default)]
    pub guardrail: GuardrailConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Bearer token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Require a bearer token on `/api/query`
    pub enabled: bool,
    /// HMAC signing secret
    pub jwt_secret: String,
    /// Signing algorithm; only the HMAC family (HS256/HS384/HS512) is supported
    pub jwt_algorithm: Algorithm,
    /// Token lifetime in minutes
    pub token_ttl_minutes: i64,
}

impl AuthConfig {
    /// Secret shipped as the default; fine for local runs only
    pub const DEFAULT_JWT_SECRET: &'static str = "dev-secret-change";

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == Self::DEFAULT_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jwt_secret: Self::DEFAULT_JWT_SECRET.to_string(),
            jwt_algorithm: Algorithm::HS256,
            token_ttl_minutes: 60,
        }
    }
}

/// Azure AI Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Service endpoint, e.g. `https://my-search.search.windows.net`
    pub endpoint: String,
    /// Query or admin key
    pub api_key: Option<String>,
    /// Index name
    pub index: String,
    /// REST API version
    pub api_version: String,
    /// Number of hits requested from the backend
    pub fetch_limit: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for transient failures
    pub max_retries: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            index: "docs-index".to_string(),
            api_version: "2023-11-01".to_string(),
            fetch_limit: 10,
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// Which generation backend to talk to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProvider {
    /// OpenAI-compatible chat completions API
    #[default]
    OpenAi,
    /// Local Ollama server
    Ollama,
}

impl FromStr for GenerationProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::config(format!("Unknown LLM provider: {}", other))),
        }
    }
}

/// Generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend provider
    pub provider: GenerationProvider,
    /// API base URL
    pub base_url: String,
    /// API key (not needed for Ollama)
    pub api_key: Option<String>,
    /// Generation model name
    pub model: String,
    /// Sampling temperature, 0.0 for deterministic answers
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for transient failures
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: GenerationProvider::OpenAi,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Thresholds applied before and after generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    /// Minimum number of retrieved passages
    pub min_docs: usize,
    /// Minimum score of the top passage (backend-specific scale)
    pub min_score: f32,
    /// Passages used for context and sources
    pub top_k: usize,
    /// Exact reply the model gives when the context has no answer
    pub refusal_token: String,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            min_docs: 1,
            min_score: 0.35,
            top_k: 6,
            refusal_token: "NOCONTEXT".to_string(),
        }
    }
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: RagConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the environment (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let mut config = RagConfig::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from an environment lookup
    pub fn apply_env<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get("AZ_SEARCH_ENDPOINT") {
            self.search.endpoint = v;
        }
        if let Some(v) = get("AZ_SEARCH_API_KEY") {
            self.search.api_key = Some(v);
        }
        if let Some(v) = get("AZ_SEARCH_INDEX") {
            self.search.index = v;
        }
        if let Some(v) = get("LLM_PROVIDER") {
            self.llm.provider = v.parse()?;
            if self.llm.provider == GenerationProvider::Ollama {
                self.llm.base_url = "http://localhost:11434".to_string();
                self.llm.model = "llama3.2:3b".to_string();
            }
        }
        if let Some(v) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = get("LLM_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = get("JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Some(v) = get("JWT_ALG") {
            self.auth.jwt_algorithm = v
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("JWT_ALG has an invalid value: {}", v)))?;
        }
        if let Some(v) = get("RAG_MIN_SCORE") {
            self.guardrail.min_score = parse_env("RAG_MIN_SCORE", &v)?;
        }
        if let Some(v) = get("RAG_MIN_DOCS") {
            self.guardrail.min_docs = parse_env("RAG_MIN_DOCS", &v)?;
        }
        if let Some(v) = get("RAG_TOP_K") {
            self.guardrail.top_k = parse_env("RAG_TOP_K", &v)?;
        }
        if let Some(v) = get("RAG_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("RAG_PORT") {
            self.server.port = parse_env("RAG_PORT", &v)?;
        }
        Ok(())
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let g = &self.guardrail;
        if g.top_k == 0 {
            return Err(Error::config("guardrail.top_k must be at least 1"));
        }
        if g.min_docs == 0 {
            return Err(Error::config("guardrail.min_docs must be at least 1"));
        }
        if !g.min_score.is_finite() || g.min_score < 0.0 {
            return Err(Error::config("guardrail.min_score must be a non-negative number"));
        }
        if g.refusal_token.trim().is_empty() {
            return Err(Error::config("guardrail.refusal_token must not be empty"));
        }
        if self.search.endpoint.trim().is_empty() {
            return Err(Error::config("search.endpoint is not set (AZ_SEARCH_ENDPOINT)"));
        }
        if self.auth.enabled {
            if self.auth.jwt_secret.is_empty() {
                return Err(Error::config("auth.jwt_secret must be set when auth is enabled"));
            }
            if !matches!(
                self.auth.jwt_algorithm,
                Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
            ) {
                return Err(Error::config(format!(
                    "auth.jwt_algorithm {:?} is not supported, use HS256, HS384 or HS512",
                    self.auth.jwt_algorithm
                )));
            }
            if self.auth.uses_default_secret() {
                tracing::warn!("auth.jwt_secret is the built-in default; set JWT_SECRET");
            }
        }
        Ok(())
    }

    /// Log which secrets are configured without printing them
    pub fn log_summary(&self) {
        tracing::info!("Configuration loaded");
        tracing::info!("  - Search index: {} @ {}", self.search.index, self.search.endpoint);
        tracing::info!("  - Search API key set: {}", self.search.api_key.is_some());
        tracing::info!("  - LLM: {:?} / {}", self.llm.provider, self.llm.model);
        tracing::info!("  - LLM API key set: {}", self.llm.api_key.is_some());
        tracing::info!(
            "  - Auth: enabled={}, algorithm={:?}, default secret={}",
            self.auth.enabled,
            self.auth.jwt_algorithm,
            self.auth.uses_default_secret()
        );
        tracing::info!(
            "  - Guardrails: min_docs={}, min_score={}, top_k={}",
            self.guardrail.min_docs,
            self.guardrail.min_score,
            self.guardrail.top_k
        );
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{} has an invalid value: {}", key, value)))
}
