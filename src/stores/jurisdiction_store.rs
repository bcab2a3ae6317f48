use sea_orm::{DatabaseConnection, EntityTrait};

use crate::errors::internal::DatabaseError;
use crate::types::db::jurisdiction::{self, Entity as Jurisdiction};

/// Read-only access to the PSGC jurisdiction reference data.
pub struct JurisdictionStore {
    db: DatabaseConnection,
}

impl JurisdictionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Look up a jurisdiction by PSGC code
    pub async fn find(&self, code: &str) -> Result<Option<jurisdiction::Model>, DatabaseError> {
        Jurisdiction::find_by_id(code)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::operation("find_jurisdiction", e))
    }

    /// Check whether a PSGC code is known
    pub async fn exists(&self, code: &str) -> Result<bool, DatabaseError> {
        Ok(self.find(code).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{MigratorTrait, RegistryMigrator};
    use sea_orm::Database;

    async fn setup_store() -> JurisdictionStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        RegistryMigrator::up(&db, None)
            .await
            .expect("Failed to run registry migrations");

        JurisdictionStore::new(db)
    }

    #[tokio::test]
    async fn test_seeded_code_exists() {
        let store = setup_store().await;

        assert!(store.exists("097332001").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_code_does_not_exist() {
        let store = setup_store().await;

        assert!(!store.exists("000000000").await.unwrap());
    }
}
