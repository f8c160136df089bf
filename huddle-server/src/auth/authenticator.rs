use crate::auth::AuthError;
use async_trait::async_trait;
use huddle_core::UserId;

/// Verifies the bearer credential presented when a connection opens.
///
/// Runs exactly once per connection attempt, before anything else.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<UserId, AuthError>;
}
