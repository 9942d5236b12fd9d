//! Create poles table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Poles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Poles::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Poles::Municipality).string().not_null())
                    .col(ColumnDef::new(Poles::Neighborhood).string().not_null())
                    .col(ColumnDef::new(Poles::Street).string().not_null())
                    .col(ColumnDef::new(Poles::Material).string().not_null())
                    .col(ColumnDef::new(Poles::Height).double().not_null())
                    .col(
                        ColumnDef::new(Poles::MechanicalTension)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Poles::Latitude).double().not_null())
                    .col(ColumnDef::new(Poles::Longitude).double().not_null())
                    .to_owned(),
            )
            .await?;

        // Composite index backing the bounding-box filter
        manager
            .create_index(
                Index::create()
                    .name("idx_poles_lat_lng")
                    .table(Poles::Table)
                    .col(Poles::Latitude)
                    .col(Poles::Longitude)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Poles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Poles {
    Table,
    Id,
    Municipality,
    Neighborhood,
    Street,
    Material,
    Height,
    MechanicalTension,
    Latitude,
    Longitude,
}
