//! HTTP API: OAuth flow endpoints and the authenticated repository proxy.

pub mod oauth;
pub mod repos;

pub use oauth::{oauth_callback, oauth_initiate};
pub use repos::list_repos;

use anyhow::Context;

use crate::config::Config;
use crate::crypto::TokenCipher;
use crate::store::{SessionStore, StateStore};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

/// Timeout for all outbound provider calls.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared application state, constructed once at startup and injected into
/// every handler. No handler touches ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cipher: Arc<TokenCipher>,
    pub state_store: Arc<dyn StateStore>,
    pub session_store: Arc<dyn SessionStore>,
    pub http: reqwest::Client,
}

/// Build the outbound HTTP client with a bounded timeout.
///
/// A builder failure is fatal at startup: falling back to a client without
/// the timeout would leave provider calls unbounded.
pub fn build_http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .context("failed to build HTTP client")
}

/// Create the API router.
///
/// `/repos` carries permissive CORS (the browser client calls it directly);
/// the OAuth endpoints are navigation targets and need none.
pub fn create_router(state: AppState) -> Router {
    let repos = Router::new()
        .route("/repos", get(repos::list_repos))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/oauth/initiate", get(oauth::oauth_initiate))
        .route("/oauth/callback", get(oauth::oauth_callback))
        .merge(repos)
        .with_state(Arc::new(state))
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error taxonomy for every handler. Each variant maps to exactly one
/// client-visible status and generic message at the [`IntoResponse`]
/// boundary; raw upstream bodies and store/crypto details never pass through.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// A required query parameter was absent (400)
    MissingParameter(&'static str),
    /// Unknown, expired, or already-consumed state token (403)
    InvalidState,
    /// Provider token endpoint refused the code exchange (500)
    TokenExchange,
    /// Missing or malformed Authorization header (400)
    MissingToken(String),
    /// Unknown or expired session token (403)
    InvalidSession,
    /// Stored credential could not be decrypted: corruption or key
    /// mismatch, not a client error (500)
    Decryption,
    /// Provider call exceeded the bounded timeout (502)
    UpstreamTimeout,
    /// Provider returned a non-success status, propagated as-is
    Upstream(u16),
    /// Anything else (500)
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) | ApiError::MissingToken(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidState | ApiError::InvalidSession => StatusCode::FORBIDDEN,
            ApiError::TokenExchange | ApiError::Decryption | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::UpstreamTimeout => StatusCode::BAD_GATEWAY,
            ApiError::Upstream(code) => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }

    /// Client-visible message. Generic by construction: no tokens, no
    /// upstream bodies, no cipher detail.
    pub fn message(&self) -> String {
        match self {
            ApiError::MissingParameter(name) => format!("Missing '{}' parameter", name),
            ApiError::InvalidState => "Invalid state token".to_string(),
            ApiError::TokenExchange => "Failed to exchange authorization code".to_string(),
            ApiError::MissingToken(msg) => msg.clone(),
            ApiError::InvalidSession => "Invalid session token".to_string(),
            ApiError::Decryption | ApiError::Internal => "Internal server error".to_string(),
            ApiError::UpstreamTimeout => "Upstream request timed out".to_string(),
            ApiError::Upstream(_) => "Upstream request failed".to_string(),
        }
    }

    /// Taxonomy tag for structured logs.
    pub fn tag(&self) -> &'static str {
        match self {
            ApiError::MissingParameter(_) => "missing_parameter",
            ApiError::InvalidState => "invalid_state",
            ApiError::TokenExchange => "token_exchange",
            ApiError::MissingToken(_) => "missing_token",
            ApiError::InvalidSession => "invalid_session",
            ApiError::Decryption => "decryption",
            ApiError::UpstreamTimeout => "upstream_timeout",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message(),
        });
        (self.status(), body).into_response()
    }
}
