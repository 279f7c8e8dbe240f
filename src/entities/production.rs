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
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionStatus {
    #[sea_orm(string_value = "NOT_STARTED")]
    NotStarted,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "ON_HOLD")]
    OnHold,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionPriority {
    #[sea_orm(string_value = "HIGH")]
    High,
    #[default]
    #[sea_orm(string_value = "MODERATE")]
    Moderate,
    #[sea_orm(string_value = "LOW")]
    Low,
}

/// One inspection result recorded against a production job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCheck {
    pub parameter: String,
    pub result: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "productions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub job_id: i32,
    pub order_id: i32,
    #[sea_orm(column_type = "Json", nullable)]
    pub equipment_assigned: Option<Json>,
    #[sea_orm(column_type = "Json")]
    pub quality_checks: Json,
    pub status: ProductionStatus,
    pub priority: ProductionPriority,
}

impl Model {
    /// Decoded quality checks; malformed entries are skipped.
    pub fn checks(&self) -> Vec<QualityCheck> {
        match &self.quality_checks {
            Json::Array(items) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::OrderId",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::inventory::Entity> for Entity {
    fn to() -> RelationDef {
        super::production_material::Relation::Material.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::production_material::Relation::Production.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn checks_skip_malformed_entries() {
        let model = Model {
            job_id: 1,
            order_id: 1,
            equipment_assigned: None,
            quality_checks: json!([
                {"parameter": "Color", "result": "Pass", "notes": ""},
                {"unexpected": true}
            ]),
            status: ProductionStatus::InProgress,
            priority: ProductionPriority::default(),
        };
        let checks = model.checks();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].parameter, "Color");
    }

    #[test]
    fn priority_parses_upper_case_names() {
        use std::str::FromStr;
        assert_eq!(
            ProductionPriority::from_str("HIGH").unwrap(),
            ProductionPriority::High
        );
        assert!(ProductionPriority::from_str("URGENT").is_err());
        assert_eq!(ProductionPriority::default(), ProductionPriority::Moderate);
    }
}
