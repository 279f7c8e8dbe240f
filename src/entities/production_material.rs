use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_materials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub production_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub material_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::production::Entity",
        from = "Column::ProductionId",
        to = "super::production::Column::JobId",
        on_delete = "Cascade"
    )]
    Production,
    #[sea_orm(
        belongs_to = "super::inventory::Entity",
        from = "Column::MaterialId",
        to = "super::inventory::Column::MaterialId",
        on_delete = "Cascade"
    )]
    Material,
}

impl ActiveModelBehavior for ActiveModel {}
