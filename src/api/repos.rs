//! Authenticated proxy for the user's repository list.
//!
//! Resolves a bearer session token to the decrypted provider token and relays
//! the request to the GitHub API. Session tokens and provider tokens never
//! appear in logs; upstream error bodies are never relayed.

use super::{ApiError, AppState};
use crate::auth::extract_bearer_token;
use crate::provider;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// GET /repos
///
/// `Authorization: Bearer <sessionToken>` → 200 JSON array of repositories
/// (upstream schema passed through opaquely).
pub async fn list_repos(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    let result = fetch_repos(&state, &headers).await;
    if let Err(err) = &result {
        warn!(%request_id, tag = err.tag(), "repos proxy failed");
    }
    result
}

async fn fetch_repos(state: &AppState, headers: &HeaderMap) -> Result<Response, ApiError> {
    let session_token =
        extract_bearer_token(headers).map_err(|err| ApiError::MissingToken(err.to_string()))?;

    let session = state
        .session_store
        .get(&session_token)
        .map_err(|_| ApiError::Internal)?
        .ok_or(ApiError::InvalidSession)?;

    // A session that exists but will not decrypt means corruption or a key
    // mismatch, so this maps to 500, not 403.
    let provider_token = state
        .cipher
        .decrypt(&session.encrypted_provider_token)
        .map_err(|_| ApiError::Decryption)?;

    debug!("session resolved, relaying to provider");

    let response = state
        .http
        .get(provider::repos_url(&state.config.api_url))
        .bearer_auth(&provider_token)
        .header("Accept", provider::GITHUB_ACCEPT)
        .send()
        .await
        .map_err(|err| {
            if err.is_timeout() {
                ApiError::UpstreamTimeout
            } else {
                ApiError::Upstream(502)
            }
        })?;

    let status = response.status();
    if status.as_u16() != 200 {
        // Propagate the upstream status, drop the upstream body
        return Err(ApiError::Upstream(status.as_u16()));
    }

    let repos: serde_json::Value = response
        .json()
        .await
        .map_err(|_| ApiError::Upstream(502))?;

    Ok(Json(repos).into_response())
}
