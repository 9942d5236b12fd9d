//! Pole entity with numeric coordinate columns

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "poles")]
pub struct Model {
    /// Stable external identifier, assigned by the source system
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    pub municipality: String,
    pub neighborhood: String,
    pub street: String,
    pub material: String,

    /// Height in meters
    pub height: f64,
    /// Mechanical tension in daN
    pub mechanical_tension: f64,

    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pole_company::Entity")]
    PoleCompany,
}

impl Related<super::pole_company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PoleCompany.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
