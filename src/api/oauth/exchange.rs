//! Authorization-code → access-token exchange.

use super::ApiError;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Token endpoint response. GitHub returns 200 with an `error` field on a bad
/// code, so `access_token` must be optional and checked explicitly.
#[derive(Deserialize, Debug)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Exchange an authorization code for a provider access token.
///
/// The raw response body is never logged: on a provider misconfiguration it
/// can echo credentials back.
pub async fn exchange_code_for_token(
    http: &reqwest::Client,
    token_url: &str,
    code: &str,
    redirect_uri: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String, ApiError> {
    let mut form_data = HashMap::new();
    form_data.insert("grant_type", "authorization_code");
    form_data.insert("code", code);
    form_data.insert("redirect_uri", redirect_uri);
    form_data.insert("client_id", client_id);
    form_data.insert("client_secret", client_secret);

    debug!("exchanging authorization code at token endpoint");

    let response = http
        .post(token_url)
        .header("Accept", "application/json")
        .form(&form_data)
        .send()
        .await
        .map_err(|err| {
            if err.is_timeout() {
                warn!("token exchange timed out");
                ApiError::UpstreamTimeout
            } else {
                warn!("token exchange request failed");
                ApiError::TokenExchange
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "token endpoint returned non-success");
        return Err(ApiError::TokenExchange);
    }

    let token_response: TokenResponse = response.json().await.map_err(|_| {
        warn!("token endpoint returned unparseable body");
        ApiError::TokenExchange
    })?;

    if let Some(error) = token_response.error {
        warn!(provider_error = %error, "token endpoint rejected the code");
        return Err(ApiError::TokenExchange);
    }

    token_response.access_token.ok_or_else(|| {
        warn!("token endpoint response had no access_token");
        ApiError::TokenExchange
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_deserialization() {
        let json = r#"{
            "access_token": "gho_1234567890",
            "token_type": "bearer",
            "scope": "repo"
        }"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, Some("gho_1234567890".to_string()));
        assert_eq!(response.error, None);
    }

    #[test]
    fn test_token_response_error_body() {
        // GitHub's 200-with-error shape for an expired code
        let json = r#"{
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        }"#;

        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, None);
        assert_eq!(response.error, Some("bad_verification_code".to_string()));
    }

    #[test]
    fn test_token_response_empty_body() {
        let response: TokenResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.access_token, None);
        assert_eq!(response.error, None);
    }
}
