// Test utilities shared across unit tests
// Only compiled when running tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use migration::{IdentityMigrator, MigratorTrait, RegistryMigrator};
use sea_orm::sqlx::sqlite::SqlitePoolOptions;
use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use uuid::Uuid;

use crate::app_data::AppData;
use crate::config::DatabaseConnections;
use crate::coordinators::RegistrationCoordinator;
use crate::errors::internal::IdentityError;
use crate::providers::{Identity, IdentityProvider};
use crate::services::visibility::RetryPolicy;
use crate::stores::{JurisdictionStore, ProfileStore, RoleStore};

/// Opens a single-connection in-memory SQLite database for tests.
///
/// The pool is built with no `max_lifetime`/`idle_timeout` and zero
/// `min_connections`, so sqlx spawns no background maintenance task. That
/// matters under `tokio::time::pause()`: a maintenance task parked on a
/// timer would let the paused clock auto-advance to it, corrupting virtual
/// time the deadline tests measure. `max_connections(1)` keeps every query
/// on the one connection that owns the in-memory database.
async fn connect_test_db() -> DatabaseConnection {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .max_lifetime(None)
        .idle_timeout(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    SqlxSqliteConnector::from_sqlx_sqlite_pool(pool)
}

/// Creates in-memory registry and identity databases with migrations applied
pub async fn setup_test_databases() -> DatabaseConnections {
    let registry = connect_test_db().await;

    RegistryMigrator::up(&registry, None)
        .await
        .expect("Failed to run registry migrations");

    let identity = connect_test_db().await;

    IdentityMigrator::up(&identity, None)
        .await
        .expect("Failed to run identity migrations");

    DatabaseConnections { registry, identity }
}

/// Builds a coordinator over fresh test databases with the given identity
/// provider and retry policy.
///
/// Returns the profile store alongside so tests can inspect persisted state.
pub async fn setup_registration_coordinator(
    identity_provider: Arc<dyn IdentityProvider>,
    retry_policy: RetryPolicy,
) -> (RegistrationCoordinator, Arc<ProfileStore>) {
    let connections = setup_test_databases().await;

    let profile_store = Arc::new(ProfileStore::new(connections.registry.clone()));
    let role_store = Arc::new(RoleStore::new(connections.registry.clone()));
    let jurisdiction_store = Arc::new(JurisdictionStore::new(connections.registry.clone()));

    let app_data = Arc::new(AppData {
        connections,
        identity_provider,
        profile_store: profile_store.clone(),
        role_store,
        jurisdiction_store,
        retry_policy,
        registration_deadline: None,
    });

    (RegistrationCoordinator::new(app_data), profile_store)
}

/// Identity provider stub with scripted visibility.
///
/// Identities are created in memory; lookups miss until the configured
/// number of calls has been consumed, modeling replication lag between the
/// provider's write path and the read path the registration flow polls.
pub struct StubIdentityProvider {
    visible_after: u32,
    lookups: AtomicU32,
    created: Mutex<HashMap<String, (String, Identity)>>,
}

impl StubIdentityProvider {
    /// Lookups miss `misses` times before identities become visible
    pub fn visible_after(misses: u32) -> Self {
        Self {
            visible_after: misses,
            lookups: AtomicU32::new(0),
            created: Mutex::new(HashMap::new()),
        }
    }

    /// Lookups never see any identity
    pub fn never_visible() -> Self {
        Self::visible_after(u32::MAX)
    }

    /// Total get_identity_by_id calls observed
    pub fn lookup_count(&self) -> u32 {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of distinct identities created
    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        let mut created = self.created.lock().unwrap();

        if let Some((stored_password, identity)) = created.get(email) {
            if stored_password == password {
                return Ok(identity.clone());
            }
            return Err(IdentityError::EmailTaken(email.to_string()));
        }

        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            created_at: Utc::now().timestamp(),
        };
        created.insert(email.to_string(), (password.to_string(), identity.clone()));
        Ok(identity)
    }

    async fn get_identity_by_id(&self, id: &str) -> Result<Option<Identity>, IdentityError> {
        let call = self.lookups.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.visible_after {
            return Ok(None);
        }

        Ok(self
            .created
            .lock()
            .unwrap()
            .values()
            .find(|(_, identity)| identity.id == id)
            .map(|(_, identity)| identity.clone()))
    }
}
