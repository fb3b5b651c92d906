//! Integration tests for the Tenant repository using in-memory
//! SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use tessera_core::error::TesseraError;
use tessera_core::models::tenant::CreateTenant;
use tessera_core::repository::TenantRepository;
use tessera_db::repository::SurrealTenantRepository;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    tessera_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn create_and_get_tenant() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo
        .create(CreateTenant {
            name: "Acme".into(),
            plan: Some(serde_json::json!({"tier": "pro", "seats": 5})),
        })
        .await
        .unwrap();

    assert_eq!(tenant.name, "Acme");
    assert_eq!(
        tenant.plan,
        Some(serde_json::json!({"tier": "pro", "seats": 5}))
    );

    let fetched = repo.get_by_id(tenant.id).await.unwrap();
    assert_eq!(fetched.id, tenant.id);
    assert_eq!(fetched.name, tenant.name);
    assert_eq!(fetched.plan, tenant.plan);
}

#[tokio::test]
async fn tenant_plan_is_optional() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo
        .create(CreateTenant {
            name: "No Plan Inc".into(),
            plan: None,
        })
        .await
        .unwrap();

    let fetched = repo.get_by_id(tenant.id).await.unwrap();
    assert_eq!(fetched.plan, None);
}

#[tokio::test]
async fn get_tenant_by_name() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo
        .create(CreateTenant {
            name: "Lookup Target".into(),
            plan: None,
        })
        .await
        .unwrap();

    let fetched = repo.get_by_name("Lookup Target").await.unwrap();
    assert_eq!(fetched.id, tenant.id);
}

#[tokio::test]
async fn duplicate_tenant_name_is_conflict() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    repo.create(CreateTenant {
        name: "Acme".into(),
        plan: None,
    })
    .await
    .unwrap();

    let err = repo
        .create(CreateTenant {
            name: "Acme".into(),
            plan: Some(serde_json::json!("starter")),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TesseraError::Conflict { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_tenant_is_not_found() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, TesseraError::NotFound { .. }), "got {err:?}");
}
