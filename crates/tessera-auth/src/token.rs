//! JWT access token issuance and verification.
//!
//! Tokens are signed HS256 with a server-held secret. The claim set
//! is a frozen snapshot of the membership at issuance time — later
//! changes to the membership never alter an already-issued token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tessera_core::models::membership::{Membership, Role};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject — user ID.
    pub sub: Uuid,
    /// Tenant the token is scoped to.
    pub tid: Uuid,
    /// Role held in that tenant at issuance (lowercase string form).
    pub role: Role,
    /// Scope strings, order preserved.
    pub scopes: Vec<String>,
    /// Opaque plan snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<serde_json::Value>,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiration (Unix seconds).
    pub exp: i64,
    /// Issuer, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Audience, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Issue a signed access token from a membership snapshot, valid from
/// now for the configured TTL.
pub fn issue_access_token(
    user_id: Uuid,
    membership: &Membership,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    issue_access_token_at(
        user_id,
        membership,
        Utc::now(),
        Duration::seconds(config.token_ttl_secs as i64),
        config,
    )
}

/// Issue a token with an explicit issued-at time and lifetime.
pub fn issue_access_token_at(
    user_id: Uuid,
    membership: &Membership,
    issued_at: DateTime<Utc>,
    ttl: Duration,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let iat = issued_at.timestamp();
    let claims = AccessTokenClaims {
        sub: user_id,
        tid: membership.tenant_id,
        role: membership.role,
        scopes: membership.scopes.clone(),
        plan: membership.plan.clone(),
        iat,
        exp: iat + ttl.num_seconds(),
        iss: config.jwt_issuer.clone(),
        aud: config.jwt_audience.clone(),
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify an access token.
///
/// The signature and expiry (zero leeway) are always checked. The
/// audience is only verified when the config carries one; otherwise
/// audience verification is disabled and tokens without a matching
/// `aud` are accepted. Expiry maps to [`AuthError::TokenExpired`];
/// signature mismatch, malformed structure, and missing claims all
/// map to [`AuthError::TokenInvalid`].
pub fn decode_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<AccessTokenClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["sub", "exp", "iat"]);
    match &config.jwt_audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    jsonwebtoken::decode::<AccessTokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-signing-secret".into(),
            ..AuthConfig::default()
        }
    }

    fn test_membership(tenant_id: Uuid) -> Membership {
        Membership {
            membership_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            tenant_id,
            role: Role::Editor,
            scopes: vec!["docs:write".into(), "docs:read".into()],
            plan: Some(serde_json::json!({"tier": "pro"})),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn claims_round_trip() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();
        let membership = test_membership(tenant_id);

        let issued_at = Utc::now();
        let token = issue_access_token_at(
            user_id,
            &membership,
            issued_at,
            Duration::seconds(3600),
            &config,
        )
        .unwrap();
        let claims = decode_access_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.tid, tenant_id);
        assert_eq!(claims.role, Role::Editor);
        // Order preserved exactly.
        assert_eq!(claims.scopes, vec!["docs:write", "docs:read"]);
        assert_eq!(claims.plan, Some(serde_json::json!({"tier": "pro"})));
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp, claims.iat + 3600);
        assert_eq!(claims.iss, None);
        assert_eq!(claims.aud, None);
    }

    #[test]
    fn expired_token_is_rejected_specifically() {
        let config = test_config();
        let membership = test_membership(Uuid::new_v4());

        let issued_at = Utc::now() - Duration::hours(2);
        let token = issue_access_token_at(
            Uuid::new_v4(),
            &membership,
            issued_at,
            Duration::hours(1),
            &config,
        )
        .unwrap();

        let err = decode_access_token(&token, &config).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired), "got {err:?}");
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let config = test_config();
        let membership = test_membership(Uuid::new_v4());
        let token = issue_access_token(Uuid::new_v4(), &membership, &config).unwrap();

        let other = AuthConfig {
            jwt_secret: "different-secret".into(),
            ..AuthConfig::default()
        };
        let err = decode_access_token(&token, &other).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)), "got {err:?}");
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = decode_access_token("not.a.token", &test_config()).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)), "got {err:?}");
    }

    #[test]
    fn audience_enforced_only_when_configured() {
        let plain = test_config();
        let with_aud = AuthConfig {
            jwt_audience: Some("tessera-api".into()),
            ..test_config()
        };

        let membership = test_membership(Uuid::new_v4());

        // Token without audience: accepted by the plain config,
        // rejected once an audience policy is configured.
        let bare = issue_access_token(Uuid::new_v4(), &membership, &plain).unwrap();
        assert!(decode_access_token(&bare, &plain).is_ok());
        let err = decode_access_token(&bare, &with_aud).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)), "got {err:?}");

        // Token with audience: accepted by both — audience
        // verification is disabled when no policy is configured.
        let stamped = issue_access_token(Uuid::new_v4(), &membership, &with_aud).unwrap();
        let claims = decode_access_token(&stamped, &with_aud).unwrap();
        assert_eq!(claims.aud.as_deref(), Some("tessera-api"));
        assert!(decode_access_token(&stamped, &plain).is_ok());
    }

    #[test]
    fn issuer_is_stamped_when_configured() {
        let config = AuthConfig {
            jwt_issuer: Some("tessera".into()),
            ..test_config()
        };
        let membership = test_membership(Uuid::new_v4());
        let token = issue_access_token(Uuid::new_v4(), &membership, &config).unwrap();
        let claims = decode_access_token(&token, &config).unwrap();
        assert_eq!(claims.iss.as_deref(), Some("tessera"));
    }

    #[test]
    fn missing_required_claims_is_invalid() {
        #[derive(Serialize)]
        struct Bare {
            sub: String,
            exp: i64,
            iat: i64,
        }
        // Structurally valid JWT, but without tid/role/scopes.
        let config = test_config();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &Bare {
                sub: Uuid::new_v4().to_string(),
                exp: (Utc::now() + Duration::hours(1)).timestamp(),
                iat: Utc::now().timestamp(),
            },
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = decode_access_token(&token, &config).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)), "got {err:?}");
    }
}
