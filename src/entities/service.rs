use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A sellable print service, e.g. "Tarpaulin Printing".
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub service_id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pricing_option::Entity")]
    PricingOptions,
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::pricing_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingOptions.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::customization_option::Entity> for Entity {
    fn to() -> RelationDef {
        super::service_customization_option::Relation::CustomizationOption.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::service_customization_option::Relation::Service.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
