mod auth_error;
mod authenticator;
mod credential;
mod jwt_authenticator;

pub use auth_error::*;
pub use authenticator::*;
pub use credential::*;
pub use jwt_authenticator::*;
