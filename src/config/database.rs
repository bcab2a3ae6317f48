use migration::{IdentityMigrator, MigratorTrait, RegistryMigrator};
use sea_orm::{Database, DatabaseConnection};

use crate::config::BootstrapSettings;
use crate::errors::internal::DatabaseError;

/// The two logical databases this service talks to.
///
/// The registry database holds profiles, roles, jurisdictions, and admin
/// reservations. The identity database belongs to the identity provider; in
/// deployments where it is reached through a read replica, its writes become
/// visible to this process with a lag, which is what the visibility wait in
/// the signup flow absorbs.
pub struct DatabaseConnections {
    pub registry: DatabaseConnection,
    pub identity: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connect to both databases.
    ///
    /// Does NOT run migrations - call migrate() separately.
    pub async fn init(settings: &BootstrapSettings) -> Result<Self, DatabaseError> {
        let registry = Database::connect(settings.registry_database_url())
            .await
            .map_err(|e| DatabaseError::operation("connect_registry_database", e))?;

        tracing::debug!(url = settings.registry_database_url(), "Connected to registry database");

        let identity = Database::connect(settings.identity_database_url())
            .await
            .map_err(|e| DatabaseError::operation("connect_identity_database", e))?;

        tracing::debug!(url = settings.identity_database_url(), "Connected to identity database");

        Ok(Self { registry, identity })
    }

    /// Run all pending migrations on both databases
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        migrate_registry_database(&self.registry).await?;
        migrate_identity_database(&self.identity).await?;
        Ok(())
    }
}

/// Run migrations on the registry database
pub async fn migrate_registry_database(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    RegistryMigrator::up(db, None)
        .await
        .map_err(|e| DatabaseError::operation("run_registry_migrations", e))?;

    tracing::debug!("Registry database migrations completed");

    Ok(())
}

/// Run migrations on the identity database
pub async fn migrate_identity_database(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    IdentityMigrator::up(db, None)
        .await
        .map_err(|e| DatabaseError::operation("run_identity_migrations", e))?;

    tracing::debug!("Identity database migrations completed");

    Ok(())
}
