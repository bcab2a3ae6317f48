// Common test utilities for integration tests

use std::sync::Arc;

use migration::{IdentityMigrator, MigratorTrait, RegistryMigrator};
use sea_orm::Database;

use citizenly_backend::app_data::AppData;
use citizenly_backend::config::DatabaseConnections;
use citizenly_backend::coordinators::RegistrationCoordinator;
use citizenly_backend::providers::{DbIdentityProvider, IdentityProvider};
use citizenly_backend::services::visibility::RetryPolicy;
use citizenly_backend::stores::{JurisdictionStore, ProfileStore, RoleStore};

/// Creates in-memory registry and identity databases with migrations applied
pub async fn setup_test_databases() -> DatabaseConnections {
    let registry = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create registry test database");

    RegistryMigrator::up(&registry, None)
        .await
        .expect("Failed to run registry migrations");

    let identity = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create identity test database");

    IdentityMigrator::up(&identity, None)
        .await
        .expect("Failed to run identity migrations");

    DatabaseConnections { registry, identity }
}

/// Builds AppData over fresh test databases with the given identity provider
/// and retry policy
pub async fn setup_app_data(
    identity_provider: Arc<dyn IdentityProvider>,
    retry_policy: RetryPolicy,
) -> Arc<AppData> {
    let connections = setup_test_databases().await;

    let profile_store = Arc::new(ProfileStore::new(connections.registry.clone()));
    let role_store = Arc::new(RoleStore::new(connections.registry.clone()));
    let jurisdiction_store = Arc::new(JurisdictionStore::new(connections.registry.clone()));

    Arc::new(AppData {
        connections,
        identity_provider,
        profile_store,
        role_store,
        jurisdiction_store,
        retry_policy,
        registration_deadline: None,
    })
}

/// Builds a full-stack coordinator: real stores over a registry database and
/// a real database-backed identity provider
pub async fn setup_full_stack() -> (Arc<RegistrationCoordinator>, Arc<AppData>) {
    let connections = setup_test_databases().await;

    let identity_provider: Arc<dyn IdentityProvider> = Arc::new(DbIdentityProvider::new(
        connections.identity.clone(),
        "test-pepper-for-integration-tests".to_string(),
    ));

    let profile_store = Arc::new(ProfileStore::new(connections.registry.clone()));
    let role_store = Arc::new(RoleStore::new(connections.registry.clone()));
    let jurisdiction_store = Arc::new(JurisdictionStore::new(connections.registry.clone()));

    let app_data = Arc::new(AppData {
        connections,
        identity_provider,
        profile_store,
        role_store,
        jurisdiction_store,
        retry_policy: RetryPolicy::default(),
        registration_deadline: None,
    });

    (
        Arc::new(RegistrationCoordinator::new(app_data.clone())),
        app_data,
    )
}
