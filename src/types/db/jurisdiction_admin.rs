use sea_orm::entity::prelude::*;

/// Admin-slot reservation for a jurisdiction.
///
/// The primary key on jurisdiction_code makes the reservation atomic: two
/// concurrent signups for the same barangay cannot both insert a row here.
/// Written exclusively by ProfileStore::reserve_and_upsert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "jurisdiction_admins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub jurisdiction_code: String,
    pub profile_id: String,
    pub reserved_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
