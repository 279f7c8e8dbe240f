use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_options")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_id: i32,
    pub customization_option_id: i32,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::ServiceId",
        on_delete = "Cascade"
    )]
    Service,
    #[sea_orm(
        belongs_to = "super::customization_option::Entity",
        from = "Column::CustomizationOptionId",
        to = "super::customization_option::Column::Id",
        on_delete = "Cascade"
    )]
    CustomizationOption,
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<super::customization_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomizationOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
