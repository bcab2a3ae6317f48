use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Seed roles
        //
        // Roles are immutable reference data: the registration flow looks them
        // up by name and never creates or mutates them.
        let insert_roles = Query::insert()
            .into_table(Roles::Table)
            .columns([Roles::Id, Roles::Name, Roles::Permissions, Roles::JurisdictionScoped])
            .values_panic([
                "role-barangay-admin".into(),
                "barangay_admin".into(),
                r#"{"residents":["create","read","update","delete"],"households":["create","read","update","delete"],"reports":["read","generate"]}"#.into(),
                true.into(),
            ])
            .values_panic([
                "role-staff".into(),
                "staff".into(),
                r#"{"residents":["create","read","update"],"households":["read"],"reports":["read"]}"#.into(),
                false.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert_roles).await?;

        // Seed a development subset of PSGC barangay codes. Production
        // deployments load the full PSGC reference set out of band.
        let insert_jurisdictions = Query::insert()
            .into_table(Jurisdictions::Table)
            .columns([Jurisdictions::Code, Jurisdictions::Name])
            .values_panic(["097332001".into(), "Barangay Ayala, Zamboanga City".into()])
            .values_panic(["097332002".into(), "Barangay Baliwasan, Zamboanga City".into()])
            .values_panic(["097332003".into(), "Barangay Baluno, Zamboanga City".into()])
            .values_panic(["137404001".into(), "Barangay Addition Hills, Mandaluyong".into()])
            .values_panic(["137404002".into(), "Barangay Bagong Silang, Mandaluyong".into()])
            .to_owned();

        manager.exec_stmt(insert_jurisdictions).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(JurisdictionAdmins::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Profiles::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Jurisdictions::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Roles::Table).to_owned())
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
}

#[derive(DeriveIden)]
enum JurisdictionAdmins {
    Table,
}
