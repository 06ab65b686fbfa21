//! Query endpoints with grounded answers and sources

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::{auth::AuthUser, state::AppState};
use crate::types::{QueryRequest, QueryResponse};

/// POST /api/query - Answer a question from the index (JSON body)
pub async fn query_rag(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>> {
    let Json(request) = body.map_err(|e| Error::BadRequest(e.body_text()))?;
    answer(&state, user, &request).await
}

/// POST /query?q=... - Same answer, question passed as a query parameter
pub async fn query_by_param(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    params: std::result::Result<Query<QueryRequest>, QueryRejection>,
) -> Result<Json<QueryResponse>> {
    let Query(request) = params.map_err(|e| Error::BadRequest(e.body_text()))?;
    answer(&state, user, &request).await
}

async fn answer(
    state: &AppState,
    user: Option<String>,
    request: &QueryRequest,
) -> Result<Json<QueryResponse>> {
    let start = Instant::now();

    let question = request
        .normalized()
        .ok_or_else(|| Error::InvalidQuery("question must not be empty".to_string()))?;

    let result = state.pipeline().answer(question).await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    Ok(Json(QueryResponse::from_result(result, user, processing_time_ms)))
}
