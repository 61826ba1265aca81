use axum::http::HeaderMap;


/// Extract bearer session token from HTTP Authorization header
///
/// Expected format: "Authorization: Bearer <token>"
/// Returns the token string if present and valid.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, TokenError> {
    let auth_header = headers
        .get("authorization")
        .ok_or(TokenError::Missing)?
        .to_str()
        .map_err(|_| TokenError::InvalidFormat)?;

    parse_bearer_token(auth_header)
}

/// Parse bearer token from Authorization header value
fn parse_bearer_token(header_value: &str) -> Result<String, TokenError> {
    // Expect "Bearer <token>"
    let parts: Vec<&str> = header_value.splitn(2, ' ').collect();

    if parts.len() != 2 {
        return Err(TokenError::InvalidFormat);
    }

    if parts[0].to_lowercase() != "bearer" {
        return Err(TokenError::InvalidFormat);
    }

    let token = parts[1].trim();

    if token.is_empty() {
        return Err(TokenError::Empty);
    }

    Ok(token.to_string())
}

/// Token extraction errors
#[derive(Debug, PartialEq, Clone)]
pub enum TokenError {
    /// Authorization header not present
    Missing,
    /// Invalid format (not "Bearer <token>")
    InvalidFormat,
    /// Token is empty string
    Empty,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Missing => write!(f, "Session token not provided"),
            TokenError::InvalidFormat => write!(f, "Invalid session token format"),
            TokenError::Empty => write!(f, "Session token is empty"),
        }
    }
}

impl std::error::Error for TokenError {}
