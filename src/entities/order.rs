use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order lifecycle. Only `Pending` and `InProgress` orders hold a queue position.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "PENDING")]
    #[serde(rename = "PENDING")]
    #[strum(serialize = "PENDING")]
    Pending,
    #[sea_orm(string_value = "IN PROGRESS")]
    #[serde(rename = "IN PROGRESS")]
    #[strum(serialize = "IN PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    #[serde(rename = "COMPLETED")]
    #[strum(serialize = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    #[serde(rename = "CANCELLED")]
    #[strum(serialize = "CANCELLED")]
    Cancelled,
}

impl OrderStatus {
    pub const ACTIVE: [OrderStatus; 2] = [OrderStatus::Pending, OrderStatus::InProgress];
    pub const TERMINAL: [OrderStatus; 2] = [OrderStatus::Completed, OrderStatus::Cancelled];

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub order_id: i32,
    /// Dense 1..N position among active orders; `None` once terminal.
    pub order_queue: Option<i32>,
    pub customer_id: i32,
    pub service_id: i32,
    #[sea_orm(column_type = "Json", nullable)]
    pub job_specifications: Option<Json>,
    pub status: OrderStatus,
    pub deadline: DateTime<Utc>,
    /// Most recent payment recorded against the order.
    pub payment_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub completed_or_cancelled: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::CustomerId",
        on_delete = "Cascade"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::service::Entity",
        from = "Column::ServiceId",
        to = "super::service::Column::ServiceId",
        on_delete = "Cascade"
    )]
    Service,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
    #[sea_orm(has_many = "super::production::Entity")]
    Productions,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::production::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Productions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_strings_match_stored_values() {
        assert_eq!(OrderStatus::InProgress.to_string(), "IN PROGRESS");
        assert_eq!(OrderStatus::from_str("CANCELLED").unwrap(), OrderStatus::Cancelled);
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"PENDING\""
        );
    }

    #[test]
    fn only_pending_and_in_progress_are_active() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::InProgress.is_active());
        assert!(!OrderStatus::Completed.is_active());
        assert!(!OrderStatus::Cancelled.is_active());
    }
}
