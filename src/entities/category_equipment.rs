use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which equipment consumes materials of which inventory category.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category_equipment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub category_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub equipment_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_category::Entity",
        from = "Column::CategoryId",
        to = "super::inventory_category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::equipment::Entity",
        from = "Column::EquipmentId",
        to = "super::equipment::Column::EquipmentId",
        on_delete = "Cascade"
    )]
    Equipment,
}

impl ActiveModelBehavior for ActiveModel {}
