use thiserror::Error;

/// WebSocket close codes sent when a connection is refused.
pub const CLOSE_CREDENTIAL_MISSING: u16 = 4000;
pub const CLOSE_CREDENTIAL_EXPIRED: u16 = 4001;
pub const CLOSE_CREDENTIAL_INVALID: u16 = 4002;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    Missing,

    #[error("Malformed credential")]
    Malformed,

    #[error("Credential expired")]
    Expired,

    #[error("Invalid credential signature")]
    InvalidSignature,

    #[error("Credential rejected: {0}")]
    Rejected(String),
}

impl AuthError {
    pub fn close_code(&self) -> u16 {
        match self {
            AuthError::Missing => CLOSE_CREDENTIAL_MISSING,
            AuthError::Expired => CLOSE_CREDENTIAL_EXPIRED,
            AuthError::Malformed | AuthError::InvalidSignature | AuthError::Rejected(_) => {
                CLOSE_CREDENTIAL_INVALID
            }
        }
    }
}
