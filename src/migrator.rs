use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_locations_table::Migration),
            Box::new(m20240101_000002_create_vehicles_table::Migration),
            Box::new(m20240101_000003_create_cargo_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_locations_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Locations::City).string_len(255).not_null())
                        .col(ColumnDef::new(Locations::State).string_len(255).not_null())
                        .col(ColumnDef::new(Locations::ZipCode).string_len(10).not_null())
                        .col(ColumnDef::new(Locations::Latitude).double().not_null())
                        .col(ColumnDef::new(Locations::Longitude).double().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_locations_zip_code")
                        .table(Locations::Table)
                        .col(Locations::ZipCode)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Locations {
        Table,
        Id,
        City,
        State,
        ZipCode,
        Latitude,
        Longitude,
    }
}

mod m20240101_000002_create_vehicles_table {

    use super::m20240101_000001_create_locations_table::Locations;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_vehicles_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Vehicles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Vehicles::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Vehicles::UniqueNumber)
                                .string_len(5)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Vehicles::CurrentLocationId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Vehicles::PayloadCapacity)
                                .integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_vehicles_current_location_id")
                                .from(Vehicles::Table, Vehicles::CurrentLocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vehicles_current_location_id")
                        .table(Vehicles::Table)
                        .col(Vehicles::CurrentLocationId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vehicles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Vehicles {
        Table,
        Id,
        UniqueNumber,
        CurrentLocationId,
        PayloadCapacity,
    }
}

mod m20240101_000003_create_cargo_table {

    use super::m20240101_000001_create_locations_table::Locations;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_cargo_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Cargo::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Cargo::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Cargo::PickUpLocationId).integer().not_null())
                        .col(
                            ColumnDef::new(Cargo::DeliveryLocationId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Cargo::Weight).integer().not_null())
                        .col(ColumnDef::new(Cargo::Description).text().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cargo_pick_up_location_id")
                                .from(Cargo::Table, Cargo::PickUpLocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_cargo_delivery_location_id")
                                .from(Cargo::Table, Cargo::DeliveryLocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_cargo_pick_up_location_id")
                        .table(Cargo::Table)
                        .col(Cargo::PickUpLocationId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Cargo::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Cargo {
        Table,
        Id,
        PickUpLocationId,
        DeliveryLocationId,
        Weight,
        Description,
    }
}
