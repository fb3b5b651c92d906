//! Database-specific error types and conversions.

use tessera_core::error::TesseraError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique constraint violated: {entity}")]
    Conflict { entity: String },

    #[error("Row decode failed: {0}")]
    Decode(String),
}

impl DbError {
    /// Classify a failed create statement: unique index violations
    /// become `Conflict`, everything else stays a raw database error.
    pub(crate) fn from_create(entity: &str, err: surrealdb::Error) -> DbError {
        if err.to_string().contains("already contains") {
            DbError::Conflict {
                entity: entity.into(),
            }
        } else {
            DbError::Surreal(err)
        }
    }
}

impl From<DbError> for TesseraError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => TesseraError::NotFound { entity, id },
            DbError::Conflict { entity } => TesseraError::Conflict { entity },
            other => TesseraError::Database(other.to_string()),
        }
    }
}
