//! Tenant domain model.
//!
//! A tenant is an isolated organization/account boundary. Users hold
//! per-tenant memberships, and every issued token is scoped to exactly
//! one tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Human-readable name, unique across the system (1-255 chars).
    pub name: String,
    /// Opaque plan/entitlement payload, passed through uninterpreted.
    pub plan: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub plan: Option<serde_json::Value>,
}
