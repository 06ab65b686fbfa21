//! Error types for the grounded RAG service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::types::RejectReason;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification used by callers to decide how to surface a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Retrieval was insufficient or the model declined to answer
    NoContext,
    /// The model answer could not be tied to any retrieved source
    MissingCitations,
    /// Bad input or credentials from the caller
    Client,
    /// Search/generation transport or internal failure
    Infrastructure,
}

/// RAG service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Not enough grounded context to answer (guardrail or model refusal)
    #[error("No context available to answer: {0}")]
    NoContext(RejectReason),

    /// The generated answer carried no verifiable citation
    #[error("Answer has no verifiable citations")]
    MissingCitations,

    /// Query was empty or otherwise unusable
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Malformed request outside of the query itself
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Search backend error
    #[error("Search backend error: {0}")]
    Search(String),

    /// LLM backend error
    #[error("LLM error: {0}")]
    Llm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token signing/verification failure on our side
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a search backend error
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NoContext(_) => ErrorCategory::NoContext,
            Error::MissingCitations => ErrorCategory::MissingCitations,
            Error::InvalidQuery(_) | Error::BadRequest(_) | Error::Unauthorized(_) => {
                ErrorCategory::Client
            }
            Error::Config(_)
            | Error::Search(_)
            | Error::Llm(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Toml(_)
            | Error::Http(_)
            | Error::Jwt(_)
            | Error::Internal(_) => ErrorCategory::Infrastructure,
        }
    }

    /// True for transport/backend failures
    pub fn is_infrastructure(&self) -> bool {
        self.category() == ErrorCategory::Infrastructure
    }
}

impl From<RejectReason> for Error {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::MissingCitations => Error::MissingCitations,
            other => Error::NoContext(other),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::NoContext(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "no_context",
                format!(
                    "{}. Try rephrasing the question or add documents that cover it.",
                    reason
                ),
            ),
            Error::MissingCitations => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "missing_citations",
                "The answer could not be grounded in any source document.".to_string(),
            ),
            Error::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, "invalid_query", msg.clone()),
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            Error::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid or expired token".to_string(),
            ),
            _ => {
                // Backend detail stays in the logs
                tracing::error!(error = %self, "Request failed with infrastructure error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
