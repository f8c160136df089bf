use crate::auth::AuthError;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CredentialQuery {
    pub token: Option<String>,
}

/// Picks the credential out of `?token=` or `Authorization: Bearer`. The query wins.
pub fn extract_credential(query: &CredentialQuery, headers: &HeaderMap) -> Result<String, AuthError> {
    if let Some(token) = query.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_owned());
    }

    let Some(header) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::Missing);
    };
    let header = header.to_str().map_err(|_| AuthError::Malformed)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::Malformed)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::Missing);
    }
    Ok(token.to_owned())
}
