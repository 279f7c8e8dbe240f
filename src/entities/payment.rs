use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
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
pub enum PaymentStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PARTIALLY_PAID")]
    PartiallyPaid,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    #[sea_orm(string_value = "REFUNDED")]
    Refunded,
}

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
pub enum DiscountType {
    #[sea_orm(string_value = "fixed")]
    Fixed,
    #[sea_orm(string_value = "percentage")]
    Percentage,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub payment_id: i32,
    pub order_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount_paid: Decimal,
    pub payment_method_id: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub discount: Option<Decimal>,
    pub discount_type: Option<DiscountType>,
    pub discount_name: Option<String>,
    pub status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
}

impl Model {
    /// Amount owed after the discount, never below zero.
    pub fn final_price(&self) -> Decimal {
        final_price(self.amount, self.discount, self.discount_type)
    }
}

pub fn final_price(
    amount: Decimal,
    discount: Option<Decimal>,
    discount_type: Option<DiscountType>,
) -> Decimal {
    let discount = discount.unwrap_or(Decimal::ZERO);
    let price = match discount_type {
        Some(DiscountType::Percentage) => amount - discount / Decimal::ONE_HUNDRED * amount,
        Some(DiscountType::Fixed) => amount - discount,
        None => amount,
    };
    price.max(Decimal::ZERO)
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
    #[sea_orm(
        belongs_to = "super::payment_method::Entity",
        from = "Column::PaymentMethodId",
        to = "super::payment_method::Column::Id",
        on_delete = "SetNull"
    )]
    PaymentMethod,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::payment_method::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethod.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn percentage_discount_scales_amount() {
        assert_eq!(
            final_price(dec!(200), Some(dec!(25)), Some(DiscountType::Percentage)),
            dec!(150)
        );
    }

    #[test]
    fn fixed_discount_subtracts_and_floors_at_zero() {
        assert_eq!(
            final_price(dec!(100), Some(dec!(30)), Some(DiscountType::Fixed)),
            dec!(70)
        );
        assert_eq!(
            final_price(dec!(100), Some(dec!(130)), Some(DiscountType::Fixed)),
            Decimal::ZERO
        );
    }

    #[test]
    fn no_discount_type_keeps_amount() {
        assert_eq!(final_price(dec!(80), Some(dec!(10)), None), dec!(80));
        assert_eq!(final_price(dec!(80), None, Some(DiscountType::Fixed)), dec!(80));
    }
}
