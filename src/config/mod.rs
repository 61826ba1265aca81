//! Process configuration, loaded from the environment once at startup.
//!
//! Every OAuth credential and URL is a deployment secret or deploy-specific
//! endpoint, so the whole surface is environment variables. A missing
//! required variable is a fatal startup error, never a per-request one.

use anyhow::{Context, Result};

/// GitHub authorization endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://github.com/login/oauth/authorize";
/// GitHub token exchange endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
/// GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STATE_TTL_SECS: i64 = 600; // 10 minutes
const DEFAULT_SESSION_TTL_SECS: i64 = 3600; // 1 hour

/// Complete service configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// GitHub OAuth app client ID
    pub client_id: String,
    /// GitHub OAuth app client secret
    pub client_secret: String,
    /// Registered OAuth callback URL (must match the GitHub app settings)
    pub callback_url: String,
    /// Frontend base URL, target of success and error redirects
    pub frontend_url: String,
    /// Base64-encoded 32-byte AES-256-GCM master key
    pub encryption_key: String,
    /// Listen address for the HTTP server
    pub bind_addr: String,
    /// Anti-CSRF state token lifetime
    pub state_ttl_secs: i64,
    /// Session token lifetime
    pub session_ttl_secs: i64,
    /// GitHub authorization endpoint (overridable for tests)
    pub auth_url: String,
    /// GitHub token endpoint (overridable for tests)
    pub token_url: String,
    /// GitHub API base URL (overridable for tests)
    pub api_url: String,
}

impl Config {
    /// Loads configuration from `REPOGATE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: required("REPOGATE_CLIENT_ID")?,
            client_secret: required("REPOGATE_CLIENT_SECRET")?,
            callback_url: required("REPOGATE_CALLBACK_URL")?,
            frontend_url: required("REPOGATE_FRONTEND_URL")?,
            encryption_key: required("REPOGATE_ENCRYPTION_KEY")?,
            bind_addr: optional("REPOGATE_BIND_ADDR", DEFAULT_BIND_ADDR),
            state_ttl_secs: optional_i64("REPOGATE_STATE_TTL_SECS", DEFAULT_STATE_TTL_SECS)?,
            session_ttl_secs: optional_i64("REPOGATE_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            auth_url: optional("REPOGATE_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("REPOGATE_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: optional("REPOGATE_API_URL", DEFAULT_API_URL),
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("missing required environment variable {}", name))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn optional_i64(name: &str, default: i64) -> Result<i64> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} must be an integer, got '{}'", name, value)),
        Err(_) => Ok(default),
    }
}
