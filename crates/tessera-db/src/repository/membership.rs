//! SurrealDB implementation of [`MembershipRepository`].
//!
//! A membership row may only be created once both referents exist,
//! and at most one row may exist per `(user_id, tenant_id)` pair.
//! The pair invariant is a UNIQUE index so concurrent duplicate
//! creates resolve atomically to one success and one `Conflict`.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tessera_core::error::TesseraResult;
use tessera_core::models::membership::{CreateMembership, Membership, Role};
use tessera_core::repository::MembershipRepository;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct MembershipRow {
    user_id: String,
    tenant_id: String,
    role: String,
    scopes: Vec<String>,
    plan: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MembershipRow {
    fn into_membership(self, membership_id: Uuid) -> Result<Membership, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Decode(format!("invalid user UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Decode(format!("invalid tenant UUID: {e}")))?;
        let role = Role::parse(&self.role)
            .ok_or_else(|| DbError::Decode(format!("unknown role: {}", self.role)))?;
        Ok(Membership {
            membership_id,
            user_id,
            tenant_id,
            role,
            scopes: self.scopes,
            plan: self.plan,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct MembershipRowWithId {
    record_id: String,
    user_id: String,
    tenant_id: String,
    role: String,
    scopes: Vec<String>,
    plan: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MembershipRowWithId {
    fn try_into_membership(self) -> Result<Membership, DbError> {
        let membership_id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid membership UUID: {e}")))?;
        MembershipRow {
            user_id: self.user_id,
            tenant_id: self.tenant_id,
            role: self.role,
            scopes: self.scopes,
            plan: self.plan,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_membership(membership_id)
    }
}

/// Row struct for existence probes.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Membership repository.
#[derive(Clone)]
pub struct SurrealMembershipRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMembershipRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Check that a referenced record exists before creating the
    /// membership row.
    async fn assert_exists(&self, table: &'static str, id: Uuid) -> Result<(), DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM type::record($table, $id) \
                 GROUP ALL",
            )
            .bind(("table", table.to_string()))
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        let total = rows.first().map(|r| r.total).unwrap_or(0);

        if total == 0 {
            return Err(DbError::NotFound {
                entity: table.into(),
                id: id_str,
            });
        }
        Ok(())
    }
}

impl<C: Connection> MembershipRepository for SurrealMembershipRepository<C> {
    async fn create(&self, input: CreateMembership) -> TesseraResult<Membership> {
        // Both foreign entities must exist at creation time.
        self.assert_exists("user", input.user_id).await?;
        self.assert_exists("tenant", input.tenant_id).await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('membership', $id) SET \
                 user_id = $user_id, tenant_id = $tenant_id, \
                 role = $role, scopes = $scopes, plan = $plan",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("role", input.role.as_str().to_string()))
            .bind(("scopes", input.scopes))
            .bind(("plan", input.plan))
            .await
            .map_err(DbError::from)?;

        // A UNIQUE index violation on (user_id, tenant_id) surfaces
        // here.
        let mut result = result
            .check()
            .map_err(|e| DbError::from_create("membership", e))?;

        let rows: Vec<MembershipRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "membership".into(),
            id: id_str,
        })?;

        Ok(row.into_membership(id)?)
    }

    async fn get(&self, user_id: Uuid, tenant_id: Uuid) -> TesseraResult<Membership> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM membership \
                 WHERE user_id = $user_id AND tenant_id = $tenant_id",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MembershipRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "membership".into(),
            id: format!("user={user_id},tenant={tenant_id}"),
        })?;

        Ok(row.try_into_membership()?)
    }

    async fn list_for_user(&self, user_id: Uuid) -> TesseraResult<Vec<Membership>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM membership \
                 WHERE user_id = $user_id ORDER BY created_at ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MembershipRowWithId> = result.take(0).map_err(DbError::from)?;

        let memberships = rows
            .into_iter()
            .map(|row| row.try_into_membership())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(memberships)
    }
}
