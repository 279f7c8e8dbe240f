use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A named variant of a service. Names are stored lowercase and are unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customization_options")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pricing_option::Entity")]
    PricingOptions,
}

impl Related<super::pricing_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingOptions.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        super::service_customization_option::Relation::Service.def()
    }

    fn via() -> Option<RelationDef> {
        Some(
            super::service_customization_option::Relation::CustomizationOption
                .def()
                .rev(),
        )
    }
}

impl ActiveModelBehavior for ActiveModel {}
