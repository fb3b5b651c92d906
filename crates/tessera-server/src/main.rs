//! Tessera Server — application entry point.
//!
//! Boots logging, loads configuration from the environment, connects
//! to SurrealDB, and brings the identity schema up to date. The HTTP
//! transport that maps the identity operations onto endpoints lives
//! outside this repository.

use tessera_auth::AuthConfig;
use tessera_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("tessera_db=info".parse().unwrap())
                .add_directive("tessera_auth=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Tessera identity server...");

    let auth_config = AuthConfig::from_env();
    if auth_config.jwt_secret.is_empty() {
        tracing::error!("TESSERA_JWT_SECRET must be set");
        std::process::exit(1);
    }

    let db_config = DbConfig::from_env();
    let db = match DbManager::connect(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = tessera_db::run_migrations(db.client()).await {
        tracing::error!(error = %e, "Schema migration failed");
        std::process::exit(1);
    }

    tracing::info!(
        token_ttl_secs = auth_config.token_ttl_secs,
        "Identity store ready"
    );
}
