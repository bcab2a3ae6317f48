use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create roles table
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Roles::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Roles::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Roles::Permissions).string().not_null())
                    .col(ColumnDef::new(Roles::JurisdictionScoped).boolean().not_null().default(false))
                    .to_owned(),
            )
            .await?;

        // Create jurisdictions table
        manager
            .create_table(
                Table::create()
                    .table(Jurisdictions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jurisdictions::Code).string().not_null().primary_key())
                    .col(ColumnDef::new(Jurisdictions::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create profiles table
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Profiles::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Profiles::FirstName).string().not_null())
                    .col(ColumnDef::new(Profiles::LastName).string().not_null())
                    .col(ColumnDef::new(Profiles::RoleId).string().not_null())
                    .col(ColumnDef::new(Profiles::JurisdictionCode).string().null())
                    .col(ColumnDef::new(Profiles::Status).string().not_null())
                    .col(ColumnDef::new(Profiles::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Profiles::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_role_id")
                            .from(Profiles::Table, Profiles::RoleId)
                            .to(Roles::Table, Roles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_jurisdiction_code")
                            .from(Profiles::Table, Profiles::JurisdictionCode)
                            .to(Jurisdictions::Table, Jurisdictions::Code),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profiles_jurisdiction_code")
                    .table(Profiles::Table)
                    .col(Profiles::JurisdictionCode)
                    .to_owned(),
            )
            .await?;

        // Create jurisdiction_admins reservation table
        //
        // The primary key on jurisdiction_code is the single-admin-per-
        // jurisdiction constraint: a concurrent second reservation fails at
        // the storage layer, not in application code.
        manager
            .create_table(
                Table::create()
                    .table(JurisdictionAdmins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JurisdictionAdmins::JurisdictionCode)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JurisdictionAdmins::ProfileId).string().not_null())
                    .col(ColumnDef::new(JurisdictionAdmins::ReservedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jurisdiction_admins_jurisdiction_code")
                            .from(JurisdictionAdmins::Table, JurisdictionAdmins::JurisdictionCode)
                            .to(Jurisdictions::Table, Jurisdictions::Code),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jurisdiction_admins_profile_id")
                    .table(JurisdictionAdmins::Table)
                    .col(JurisdictionAdmins::ProfileId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JurisdictionAdmins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Jurisdictions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Name,
    Permissions,
    JurisdictionScoped,
}

#[derive(DeriveIden)]
enum Jurisdictions {
    Table,
    Code,
    Name,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    RoleId,
    JurisdictionCode,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JurisdictionAdmins {
    Table,
    JurisdictionCode,
    ProfileId,
    ReservedAt,
}
