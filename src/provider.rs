//! GitHub endpoint contract.
//!
//! The broker talks to a single fixed provider with a single fixed scope;
//! endpoint URLs live in [`Config`](crate::config::Config) so tests can point
//! them at a mock server.

/// The one scope this broker requests.
pub const SCOPE: &str = "repo";

/// Accept header for GitHub REST API calls.
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Build the authorization URL the user-agent is redirected to.
///
/// All query values are URL-encoded.
pub fn build_auth_url(auth_url: &str, client_id: &str, callback_url: &str, state: &str) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&state={}&scope={}",
        auth_url,
        urlencoding::encode(client_id),
        urlencoding::encode(callback_url),
        urlencoding::encode(state),
        urlencoding::encode(SCOPE),
    )
}

/// Build the repository listing URL.
pub fn repos_url(api_url: &str) -> String {
    format!("{}/user/repos?per_page=100", api_url)
}
