//! Tessera Auth — password credential hashing, token issuance and
//! validation, and the identity service that ties a user, a tenant,
//! and an authorization context together at request time.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{
    AddMembership, AuthContext, IdentityService, LoginInput, LoginOutput, RegisterUser,
    UpdateUserInput, UserProfile,
};
pub use token::AccessTokenClaims;
