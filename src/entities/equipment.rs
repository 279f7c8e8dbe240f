use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum EquipmentCondition {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "working")]
    Working,
    #[sea_orm(string_value = "damaged")]
    Damaged,
    #[sea_orm(string_value = "broken")]
    Broken,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "equipment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub equipment_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub condition: EquipmentCondition,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::inventory_category::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_equipment::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_equipment::Relation::Equipment.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
