use std::sync::Arc;
use std::time::Duration;

use crate::config::{BootstrapSettings, DatabaseConnections, RetrySettings};
use crate::providers::{DbIdentityProvider, IdentityProvider};
use crate::services::visibility::RetryPolicy;
use crate::stores::{JurisdictionStore, ProfileStore, RoleStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across
/// coordinators and API handlers, so every request sees the same stores and
/// the same identity-provider boundary.
pub struct AppData {
    pub connections: DatabaseConnections,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub profile_store: Arc<ProfileStore>,
    pub role_store: Arc<RoleStore>,
    pub jurisdiction_store: Arc<JurisdictionStore>,
    pub retry_policy: RetryPolicy,
    pub registration_deadline: Option<Duration>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// Database connections should be initialized and migrated before
    /// calling this.
    pub fn init(
        connections: DatabaseConnections,
        settings: &BootstrapSettings,
        retry_settings: &RetrySettings,
    ) -> Self {
        tracing::info!("Initializing AppData...");

        let identity_provider: Arc<dyn IdentityProvider> = Arc::new(DbIdentityProvider::new(
            connections.identity.clone(),
            settings.identity_password_pepper().to_string(),
        ));

        tracing::debug!("Creating stores...");
        let profile_store = Arc::new(ProfileStore::new(connections.registry.clone()));
        let role_store = Arc::new(RoleStore::new(connections.registry.clone()));
        let jurisdiction_store = Arc::new(JurisdictionStore::new(connections.registry.clone()));
        tracing::debug!("Stores created");

        tracing::info!("AppData initialization complete");

        Self {
            connections,
            identity_provider,
            profile_store,
            role_store,
            jurisdiction_store,
            retry_policy: retry_settings.policy(),
            registration_deadline: settings.registration_deadline(),
        }
    }
}
