//! Identity service — registration, login, and token context
//! resolution orchestrated over the repository contracts.
//!
//! Generic over repository implementations so that the auth layer has
//! no dependency on the database crate.

use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::models::membership::{CreateMembership, Membership, Role};
use tessera_core::models::tenant::{CreateTenant, Tenant};
use tessera_core::models::user::{CreateUser, UpdateUser, User};
use tessera_core::repository::{MembershipRepository, TenantRepository, UserRepository};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token::{self, AccessTokenClaims};

/// Input for user registration.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
    pub is_active: bool,
}

/// Partial user update; `None` fields are left unchanged. A supplied
/// password is re-hashed before it reaches the store.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

/// Membership creation input; the user comes from the caller's path.
#[derive(Debug, Clone)]
pub struct AddMembership {
    pub tenant_id: Uuid,
    pub role: Role,
    pub scopes: Vec<String>,
    pub plan: Option<serde_json::Value>,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub tenant_id: Uuid,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed access token scoped to the requested tenant.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// A user together with their explicitly fetched memberships.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub memberships: Vec<Membership>,
}

/// Authorization context for a protected operation.
///
/// `claims` carries the frozen issuance snapshot of role, scopes, and
/// plan; `user` and `membership` reflect current store state, which
/// is re-checked on every resolution.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
    pub membership: Membership,
    pub claims: AccessTokenClaims,
}

/// The identity service.
pub struct IdentityService<T, U, M> {
    tenants: T,
    users: U,
    memberships: M,
    config: AuthConfig,
}

impl<T, U, M> IdentityService<T, U, M>
where
    T: TenantRepository,
    U: UserRepository,
    M: MembershipRepository,
{
    pub fn new(tenants: T, users: U, memberships: M, config: AuthConfig) -> Self {
        Self {
            tenants,
            users,
            memberships,
            config,
        }
    }

    // -------------------------------------------------------------------
    // Tenants
    // -------------------------------------------------------------------

    /// Register a new tenant. Fails with `Conflict` if the name is
    /// already taken.
    pub async fn register_tenant(&self, input: CreateTenant) -> TesseraResult<Tenant> {
        if input.name.is_empty() || input.name.len() > 255 {
            return Err(TesseraError::Validation {
                message: "tenant name must be 1-255 characters".into(),
            });
        }
        self.tenants.create(input).await
    }

    pub async fn get_tenant(&self, id: Uuid) -> TesseraResult<Tenant> {
        self.tenants.get_by_id(id).await
    }

    // -------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------

    /// Register a new user. The password is hashed before it crosses
    /// the repository boundary. Fails with `Conflict` if the email is
    /// already registered.
    pub async fn register_user(&self, input: RegisterUser) -> TesseraResult<UserProfile> {
        self.check_password_policy(&input.password)?;

        let user = self
            .users
            .create(CreateUser {
                email: input.email,
                full_name: input.full_name,
                password_hash: password::hash_password(&input.password),
                is_active: input.is_active,
            })
            .await?;

        // A fresh user has no memberships by definition.
        Ok(UserProfile {
            user,
            memberships: Vec::new(),
        })
    }

    pub async fn get_user(&self, id: Uuid) -> TesseraResult<UserProfile> {
        let user = self.users.get_by_id(id).await?;
        self.profile(user).await
    }

    /// Partial update. Only supplied fields change; a supplied
    /// password is re-hashed with a fresh salt.
    pub async fn update_user(&self, id: Uuid, input: UpdateUserInput) -> TesseraResult<UserProfile> {
        let password_hash = match &input.password {
            Some(p) => {
                self.check_password_policy(p)?;
                Some(password::hash_password(p))
            }
            None => None,
        };

        let user = self
            .users
            .update(
                id,
                UpdateUser {
                    full_name: input.full_name,
                    is_active: input.is_active,
                    password_hash,
                },
            )
            .await?;

        self.profile(user).await
    }

    // -------------------------------------------------------------------
    // Memberships
    // -------------------------------------------------------------------

    /// Bind a user to a tenant. Fails with `NotFound` if either
    /// referent is missing and with `Conflict` if the pair already
    /// has a membership.
    pub async fn add_membership(
        &self,
        user_id: Uuid,
        input: AddMembership,
    ) -> TesseraResult<Membership> {
        self.memberships
            .create(CreateMembership {
                user_id,
                tenant_id: input.tenant_id,
                role: input.role,
                scopes: input.scopes,
                plan: input.plan,
            })
            .await
    }

    // -------------------------------------------------------------------
    // Authentication & context resolution
    // -------------------------------------------------------------------

    /// Verify credentials and resolve the membership for the
    /// requested tenant.
    ///
    /// Absent user, inactive user, and wrong password all collapse
    /// into the same `Unauthorized` error. A missing membership is
    /// `Forbidden` — distinguishable, but only by callers who already
    /// authenticated correctly.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        tenant_id: Uuid,
    ) -> TesseraResult<(User, Membership)> {
        let user = match self.users.get_by_email(email).await {
            Ok(user) => user,
            Err(TesseraError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        if !user.is_active {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !password::verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        let membership = match self.memberships.get(user.id, tenant_id).await {
            Ok(membership) => membership,
            Err(TesseraError::NotFound { .. }) => return Err(AuthError::NotAMember.into()),
            Err(e) => return Err(e),
        };

        Ok((user, membership))
    }

    /// Authenticate and issue a bearer token carrying the membership
    /// snapshot.
    pub async fn login(&self, input: LoginInput) -> TesseraResult<LoginOutput> {
        let (user, membership) = self
            .authenticate(&input.email, &input.password, input.tenant_id)
            .await?;

        let access_token = token::issue_access_token(user.id, &membership, &self.config)?;

        Ok(LoginOutput {
            access_token,
            token_type: "bearer",
            expires_in: self.config.token_ttl_secs,
        })
    }

    /// Re-validate a bearer token against current store state.
    ///
    /// The claim snapshot (role, scopes, plan) is trusted for the
    /// token's lifetime, but user existence, active status, and
    /// membership existence are re-checked on every call — a token
    /// issued before a deactivation or membership removal stops
    /// working immediately.
    pub async fn resolve_context(&self, bearer_token: &str) -> TesseraResult<AuthContext> {
        let claims = token::decode_access_token(bearer_token, &self.config)?;

        let user = match self.users.get_by_id(claims.sub).await {
            Ok(user) => user,
            Err(TesseraError::NotFound { .. }) => {
                return Err(TesseraError::Unauthorized {
                    reason: "user not found or inactive".into(),
                });
            }
            Err(e) => return Err(e),
        };

        if !user.is_active {
            return Err(TesseraError::Unauthorized {
                reason: "user not found or inactive".into(),
            });
        }

        let membership = match self.memberships.get(user.id, claims.tid).await {
            Ok(membership) => membership,
            Err(TesseraError::NotFound { .. }) => return Err(AuthError::NotAMember.into()),
            Err(e) => return Err(e),
        };

        Ok(AuthContext {
            user,
            membership,
            claims,
        })
    }

    /// Resolve a bearer token and return the subject's profile with
    /// all current memberships.
    pub async fn current_user(&self, bearer_token: &str) -> TesseraResult<UserProfile> {
        let context = self.resolve_context(bearer_token).await?;
        self.profile(context.user).await
    }

    // -------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------

    async fn profile(&self, user: User) -> TesseraResult<UserProfile> {
        let memberships = self.memberships.list_for_user(user.id).await?;
        Ok(UserProfile { user, memberships })
    }

    fn check_password_policy(&self, password: &str) -> TesseraResult<()> {
        if password.len() < self.config.min_password_length {
            return Err(TesseraError::Validation {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }
        Ok(())
    }
}
