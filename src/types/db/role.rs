use sea_orm::entity::prelude::*;

/// Immutable reference data seeded by migration.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,

    // JSON object mapping resource -> allowed actions
    pub permissions: String,

    // Roles with this flag require a jurisdiction_code at signup and are
    // subject to the one-admin-per-jurisdiction constraint.
    pub jurisdiction_scoped: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
