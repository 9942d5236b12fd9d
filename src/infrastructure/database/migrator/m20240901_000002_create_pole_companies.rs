//! Create pole_companies table

use sea_orm_migration::prelude::*;

use super::m20240901_000001_create_poles::Poles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PoleCompanies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PoleCompanies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PoleCompanies::PoleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PoleCompanies::Company).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pole_companies_pole")
                            .from(PoleCompanies::Table, PoleCompanies::PoleId)
                            .to(Poles::Table, Poles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Per-page company aggregation filters on pole_id
        manager
            .create_index(
                Index::create()
                    .name("idx_pole_companies_pole_id")
                    .table(PoleCompanies::Table)
                    .col(PoleCompanies::PoleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PoleCompanies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PoleCompanies {
    Table,
    Id,
    PoleId,
    Company,
}
