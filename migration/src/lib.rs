pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_registry_schema;
mod m20250601_000002_seed_reference_data;
mod m20250615_000001_create_identity_schema;

pub struct RegistryMigrator;

#[async_trait::async_trait]
impl MigratorTrait for RegistryMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_registry_schema::Migration),
            Box::new(m20250601_000002_seed_reference_data::Migration),
        ]
    }
}

pub struct IdentityMigrator;

#[async_trait::async_trait]
impl MigratorTrait for IdentityMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250615_000001_create_identity_schema::Migration),
        ]
    }
}
