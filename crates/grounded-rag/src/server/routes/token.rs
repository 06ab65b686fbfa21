//! Token issuance endpoint

use axum::{extract::State, Form, Json};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::TokenResponse;

/// Form body for `POST /token`
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /token - Issue a bearer token
///
/// Any non-empty username/password pair is accepted; there is no user store.
pub async fn issue_token(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>> {
    if form.username.trim().is_empty() || form.password.is_empty() {
        return Err(Error::BadRequest("Invalid creds".to_string()));
    }

    let issuer = state
        .token_issuer()
        .ok_or_else(|| Error::BadRequest("token auth is disabled".to_string()))?;

    let token = issuer.issue(form.username.trim())?;
    tracing::info!("Issued token for {}", form.username.trim());

    Ok(Json(TokenResponse::bearer(token)))
}
