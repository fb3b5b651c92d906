//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async and assumed transactional
//! against a single backing store. Uniqueness invariants (unique
//! email, unique tenant name, one membership per `(user, tenant)`
//! pair) are enforced by the implementation with atomic
//! check-and-insert semantics, never by read-then-write in
//! application logic.

use uuid::Uuid;

use crate::error::TesseraResult;
use crate::models::membership::{CreateMembership, Membership};
use crate::models::tenant::{CreateTenant, Tenant};
use crate::models::user::{CreateUser, UpdateUser, User};

pub trait TenantRepository: Send + Sync {
    /// Fails with `Conflict` if the tenant name is already taken.
    fn create(&self, input: CreateTenant) -> impl Future<Output = TesseraResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TesseraResult<Tenant>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = TesseraResult<Tenant>> + Send;
}

pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` if the email is already registered.
    fn create(&self, input: CreateUser) -> impl Future<Output = TesseraResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TesseraResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = TesseraResult<User>> + Send;
    /// Partial update: only the supplied fields are changed.
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = TesseraResult<User>> + Send;
}

pub trait MembershipRepository: Send + Sync {
    /// Fails with `NotFound` if the user or tenant is missing, and
    /// with `Conflict` if a membership already exists for the pair.
    fn create(
        &self,
        input: CreateMembership,
    ) -> impl Future<Output = TesseraResult<Membership>> + Send;
    fn get(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> impl Future<Output = TesseraResult<Membership>> + Send;
    fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = TesseraResult<Vec<Membership>>> + Send;
}
