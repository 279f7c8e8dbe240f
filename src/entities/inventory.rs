use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UnitOfMeasurement {
    #[default]
    #[sea_orm(string_value = "qty")]
    Qty,
    #[sea_orm(string_value = "liters")]
    Liters,
    #[sea_orm(string_value = "meters")]
    Meters,
    #[sea_orm(string_value = "mm")]
    Mm,
    #[sea_orm(string_value = "rolls")]
    Rolls,
    #[sea_orm(string_value = "sheets")]
    Sheets,
    #[sea_orm(string_value = "kg")]
    Kg,
    #[sea_orm(string_value = "pcs")]
    Pcs,
    #[sea_orm(string_value = "cm")]
    Cm,
    #[sea_orm(string_value = "grams")]
    Grams,
}

/// A stocked material.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub material_id: i32,
    pub name: String,
    pub category_id: Option<i32>,
    pub stock_level: i32,
    pub reorder_threshold: i32,
    pub supplier_id: Option<i32>,
    pub unit_of_measurement: UnitOfMeasurement,
}

impl Model {
    pub fn needs_reorder(&self) -> bool {
        self.stock_level < self.reorder_threshold
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_category::Entity",
        from = "Column::CategoryId",
        to = "super::inventory_category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id",
        on_delete = "SetNull"
    )]
    Supplier,
}

impl Related<super::inventory_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::production::Entity> for Entity {
    fn to() -> RelationDef {
        super::production_material::Relation::Production.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::production_material::Relation::Material.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
