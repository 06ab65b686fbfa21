//! API routes for the RAG server

pub mod query;
pub mod token;

use axum::{
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Query
        .route("/query", post(query::query_rag))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "grounded-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Grounded question answering with enforced source citations",
        "endpoints": {
            "POST /token": "Issue a bearer token (form: username, password)",
            "POST /api/query": "Answer a question with cited sources",
            "POST /query?q=": "Same as /api/query with the question as a query parameter",
            "GET /health": "Liveness",
            "GET /ready": "Search and generation backends reachable"
        },
        "features": {
            "guardrails": "Rejects empty or low-confidence retrieval before calling the model",
            "refusal_token": "Model declines explicitly when the context has no answer",
            "citation_enforcement": "Uncited answers get their sources appended or are rejected"
        }
    }))
}
