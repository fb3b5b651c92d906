//! Authentication configuration.

/// Configuration for token issuance and credential policy.
///
/// The signing algorithm is fixed to HS256; only the secret, token
/// lifetime, and the optional issuer/audience strings vary per
/// deployment.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric secret for HS256 token signing.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 3600 = 60 minutes).
    pub token_ttl_secs: u64,
    /// Optional `iss` claim stamped into issued tokens.
    pub jwt_issuer: Option<String>,
    /// Optional `aud` claim. When set, audience is also verified on
    /// decode; when unset, audience verification is disabled.
    pub jwt_audience: Option<String>,
    /// Minimum password length accepted at registration.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: 3600,
            jwt_issuer: None,
            jwt_audience: None,
            min_password_length: 8,
        }
    }
}

impl AuthConfig {
    /// Build a config from `TESSERA_JWT_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            jwt_secret: std::env::var("TESSERA_JWT_SECRET").unwrap_or(defaults.jwt_secret),
            token_ttl_secs: std::env::var("TESSERA_JWT_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.token_ttl_secs),
            jwt_issuer: std::env::var("TESSERA_JWT_ISSUER").ok(),
            jwt_audience: std::env::var("TESSERA_JWT_AUDIENCE").ok(),
            min_password_length: defaults.min_password_length,
        }
    }
}
