use crate::auth::{AuthError, Authenticator};
use async_trait::async_trait;
use huddle_core::UserId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

/// Session token claims. Tokens carry the user id as `id`; `sub` is accepted too.
#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    sub: Option<String>,
    #[allow(dead_code)]
    exp: i64,
}

/// HS256 verifier backed by a shared secret.
pub struct JwtAuthenticator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_)
                | ErrorKind::MissingRequiredClaim(_) => AuthError::Malformed,
                other => AuthError::Rejected(format!("{:?}", other)),
            }
        })?;

        let claims = data.claims;
        claims
            .id
            .or(claims.sub)
            .filter(|id| !id.is_empty())
            .map(UserId::from)
            .ok_or(AuthError::Malformed)
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn verify(&self, credential: &str) -> Result<UserId, AuthError> {
        self.verify_token(credential)
    }
}
