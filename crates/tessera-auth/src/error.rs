//! Authentication error types.

use tessera_core::error::TesseraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Covers absent user, inactive user, and wrong password alike so
    /// callers cannot distinguish them (enumeration resistance).
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    /// The caller authenticated correctly but holds no membership for
    /// the requested tenant.
    #[error("user is not a member of the requested tenant")]
    NotAMember,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for TesseraError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
                TesseraError::Unauthorized {
                    reason: err.to_string(),
                }
            }
            AuthError::NotAMember => TesseraError::Forbidden {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => TesseraError::Crypto(msg),
        }
    }
}
