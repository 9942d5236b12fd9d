//! Company attachment entity (many companies per pole)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pole_companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub pole_id: i64,
    pub company: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pole::Entity",
        from = "Column::PoleId",
        to = "super::pole::Column::Id",
        on_delete = "Cascade"
    )]
    Pole,
}

impl Related<super::pole::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pole.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
