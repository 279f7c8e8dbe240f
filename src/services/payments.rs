use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::db::settle;
use crate::dto::PaymentInput;
use crate::entities::{order, payment, payment_method, PaymentStatus};
use crate::errors::ServiceError;

/// A payment with its discounted total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: payment::Model,
    pub final_price: Decimal,
}

impl From<payment::Model> for PaymentView {
    fn from(payment: payment::Model) -> Self {
        let final_price = payment.final_price();
        PaymentView {
            payment,
            final_price,
        }
    }
}

#[derive(Clone)]
pub struct PaymentService {
    db: Arc<DatabaseConnection>,
}

impl PaymentService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a payment and make it the order's current payment.
    #[instrument(skip(self, input), fields(order_id = input.order_id))]
    pub async fn create(&self, input: PaymentInput) -> Result<PaymentView, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;
        let result: Result<payment::Model, ServiceError> = async {
            order::Entity::find_by_id(input.order_id)
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::field("order_id", "Order not found."))?;

            if let Some(method_id) = input.payment_method_id {
                payment_method::Entity::find_by_id(method_id)
                    .one(&txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::field("payment_method_id", "Select a valid payment method.")
                    })?;
            }

            let created = payment::ActiveModel {
                order_id: Set(input.order_id),
                amount: Set(input.amount),
                amount_paid: Set(input.amount_paid),
                payment_method_id: Set(input.payment_method_id),
                discount: Set(Some(input.discount.unwrap_or(Decimal::ZERO))),
                discount_type: Set(input.discount_type),
                discount_name: Set(input.discount_name.clone()),
                status: Set(input.status.unwrap_or(PaymentStatus::Pending)),
                payment_date: Set(input.payment_date.unwrap_or_else(Utc::now)),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            order::Entity::update_many()
                .col_expr(order::Column::PaymentId, Expr::value(created.payment_id))
                .filter(order::Column::OrderId.eq(input.order_id))
                .exec(&txn)
                .await?;
            Ok(created)
        }
        .await;

        let created = settle(txn, result).await?;
        info!(payment_id = created.payment_id, "Payment recorded");
        Ok(created.into())
    }

    /// Payments, newest first, optionally for one order.
    pub async fn list(&self, order_id: Option<i32>) -> Result<Vec<PaymentView>, ServiceError> {
        let mut select = payment::Entity::find().order_by_desc(payment::Column::PaymentDate);
        if let Some(order_id) = order_id {
            select = select.filter(payment::Column::OrderId.eq(order_id));
        }
        Ok(select
            .all(&*self.db)
            .await?
            .into_iter()
            .map(PaymentView::from)
            .collect())
    }
}
