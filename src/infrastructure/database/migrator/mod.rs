//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240901_000001_create_poles;
mod m20240901_000002_create_pole_companies;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_poles::Migration),
            Box::new(m20240901_000002_create_pole_companies::Migration),
        ]
    }
}
