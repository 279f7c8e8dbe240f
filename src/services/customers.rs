use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::CustomerInput;
use crate::entities::{customer, order, payment};
use crate::errors::ServiceError;
use crate::services::payments::PaymentView;

/// A customer with their order and payment history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: customer::Model,
    pub orders: Vec<order::Model>,
    pub payments: Vec<PaymentView>,
}

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DatabaseConnection>,
}

impl CustomerService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists all customers
    pub async fn list(&self) -> Result<Vec<customer::Model>, ServiceError> {
        Ok(customer::Entity::find()
            .order_by_asc(customer::Column::Name)
            .all(&*self.db)
            .await?)
    }

    /// Creates a new customer
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CustomerInput) -> Result<customer::Model, ServiceError> {
        input.validate()?;
        let created = customer::ActiveModel {
            name: Set(input.name.trim().to_string()),
            contact_number: Set(input.contact_number.trim().to_string()),
            email: Set(Some(input.email.trim().to_string()).filter(|e| !e.is_empty())),
            address: Set(input.address),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(customer_id = created.customer_id, "Customer created");
        Ok(created)
    }

    /// Gets a customer with their history
    pub async fn detail(&self, customer_id: i32) -> Result<CustomerDetail, ServiceError> {
        let db = &*self.db;
        let found = customer::Entity::find_by_id(customer_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Customer not found.".to_string()))?;

        let orders = found
            .find_related(order::Entity)
            .order_by_desc(order::Column::CreatedAt)
            .all(db)
            .await?;
        let order_ids: Vec<i32> = orders.iter().map(|o| o.order_id).collect();
        let payments = payment::Entity::find()
            .filter(payment::Column::OrderId.is_in(order_ids))
            .order_by_desc(payment::Column::PaymentDate)
            .all(db)
            .await?
            .into_iter()
            .map(PaymentView::from)
            .collect();

        Ok(CustomerDetail {
            customer: found,
            orders,
            payments,
        })
    }
}
