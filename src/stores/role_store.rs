use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::errors::internal::DatabaseError;
use crate::types::db::role::{self, Entity as Role};

/// Read-only access to the seeded role reference data.
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolve a role by its public name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<role::Model>, DatabaseError> {
        Role::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::operation("find_role_by_name", e))
    }
}
