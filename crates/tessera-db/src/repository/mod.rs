//! SurrealDB repository implementations.

mod membership;
mod tenant;
mod user;

pub use membership::SurrealMembershipRepository;
pub use tenant::SurrealTenantRepository;
pub use user::SurrealUserRepository;
