//! OAuth 2.0 authorization-code flow against GitHub.
//!
//! 1. GET /oauth/initiate → redirect to GitHub with a fresh CSRF state
//! 2. User authorizes on GitHub
//! 3. GitHub redirects to GET /oauth/callback?code=&state=
//! 4. State consumed (single-use), code exchanged for an access token
//! 5. Token encrypted and stored under a new session token
//! 6. Redirect to the frontend with ?session=<token>
//!
//! Callback failures redirect to the frontend with ?error=<message>;
//! initiation failures answer 500 JSON (no safe redirect target exists yet).

mod exchange;

use super::{ApiError, AppState};
use crate::provider;
use crate::store::{SessionRecord, StateRecord};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// OAuth callback query parameters
#[derive(Deserialize)]
pub struct OAuthCallback {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// GET /oauth/initiate
///
/// Creates an anti-CSRF state record and redirects the user-agent to the
/// GitHub authorization page.
pub async fn oauth_initiate(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let csrf_state = Uuid::new_v4().to_string();

    state
        .state_store
        .put(StateRecord::new(
            csrf_state.clone(),
            state.config.state_ttl_secs,
        ))
        .map_err(|err| {
            warn!(step = "state_created", error = %err, "failed to persist state token");
            ApiError::Internal
        })?;

    let auth_url = provider::build_auth_url(
        &state.config.auth_url,
        &state.config.client_id,
        &state.config.callback_url,
        &csrf_state,
    );

    info!("redirecting to provider authorization page");
    Ok(found(&auth_url))
}

/// GET /oauth/callback
///
/// Validates and consumes the state token, exchanges the code, encrypts the
/// provider token, creates a session, and redirects to the frontend.
///
/// # Security
/// - State is consumed atomically before anything else runs: a replay fails
///   with `InvalidState` even when a later step failed the first time
/// - The provider token exists in plaintext only inside this invocation
pub async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Query(callback): Query<OAuthCallback>,
) -> Response {
    let request_id = Uuid::new_v4();

    // Provider sent an error instead of a code (user denied, bad client
    // config). Nothing to validate; report and bail.
    if let Some(error) = &callback.error {
        warn!(
            %request_id,
            provider_error = %error,
            has_description = callback.error_description.is_some(),
            "provider reported authorization failure"
        );
        return error_redirect(&state.config.frontend_url, "Authorization failed");
    }

    match run_callback(&state, callback, request_id).await {
        Ok(session_token) => {
            info!(%request_id, "oauth callback complete, session issued");
            let target = format!(
                "{}?session={}",
                state.config.frontend_url,
                urlencoding::encode(&session_token)
            );
            found(&target)
        }
        Err(err) => {
            warn!(%request_id, tag = err.tag(), "oauth callback failed");
            error_redirect(&state.config.frontend_url, &err.message())
        }
    }
}

/// Callback pipeline. Fail-fast: each step short-circuits with the taxonomy
/// error for that step.
async fn run_callback(
    state: &AppState,
    callback: OAuthCallback,
    request_id: Uuid,
) -> Result<String, ApiError> {
    let code = callback.code.ok_or(ApiError::MissingParameter("code"))?;
    let csrf_state = callback.state.ok_or(ApiError::MissingParameter("state"))?;

    // Single atomic remove-and-return: of two callbacks racing on the same
    // state, exactly one proceeds.
    state
        .state_store
        .take(&csrf_state)
        .map_err(|_| ApiError::Internal)?
        .ok_or(ApiError::InvalidState)?;
    debug!(%request_id, step = "state_validated", "state token consumed");

    let access_token = exchange::exchange_code_for_token(
        &state.http,
        &state.config.token_url,
        &code,
        &state.config.callback_url,
        &state.config.client_id,
        &state.config.client_secret,
    )
    .await?;
    debug!(%request_id, step = "code_exchanged", "provider token received");

    let encrypted = state
        .cipher
        .encrypt(&access_token)
        .map_err(|_| ApiError::Internal)?;
    debug!(%request_id, step = "token_encrypted", "provider token encrypted");

    let session_token = Uuid::new_v4().to_string();
    state
        .session_store
        .put(SessionRecord::new(
            session_token.clone(),
            encrypted,
            state.config.session_ttl_secs,
        ))
        .map_err(|_| ApiError::Internal)?;
    debug!(%request_id, step = "session_created", "session record stored");

    Ok(session_token)
}

/// 302 to the frontend with the message in an `error` query parameter,
/// URL-encoded so it cannot smuggle extra parameters or header content.
fn error_redirect(frontend_url: &str, message: &str) -> Response {
    let target = format!("{}?error={}", frontend_url, urlencoding::encode(message));
    found(&target)
}

/// 302 Found. Browsers follow OAuth redirects with GET; axum's `Redirect`
/// only offers 303/307/308, so build the response directly.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
