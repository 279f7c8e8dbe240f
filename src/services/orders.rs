use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::db::settle;
use crate::dto::{CustomerInput, OrderInput};
use crate::entities::{customer, order, service, OrderStatus};
use crate::errors::ServiceError;
use crate::services::order_queue::{enqueue_position, queue_rows, QueueRow};

const SEARCH_LIMIT: u64 = 10;

/// Order intake and lookup. Queue mutations live in `order_queue`.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a PENDING order at the back of the queue.
    ///
    /// The customer is either referenced by id or fetched/created by name from
    /// the nested customer form.
    #[instrument(skip(self, input), fields(service_id = input.service_id))]
    pub async fn create(&self, input: OrderInput) -> Result<order::Model, ServiceError> {
        input.validate()?;
        if input.customer_id.is_none() {
            if let Some(walk_in) = &input.customer {
                walk_in.validate()?;
            }
        }

        let txn = self.db.begin().await?;
        let result: Result<order::Model, ServiceError> = async {
            service::Entity::find_by_id(input.service_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::field(
                        "service_id",
                        "Select a valid choice. That choice is not one of the available choices.",
                    )
                })?;

            let customer_id = match (input.customer_id, &input.customer) {
                (Some(customer_id), _) => {
                    customer::Entity::find_by_id(customer_id)
                        .one(&txn)
                        .await?
                        .ok_or_else(|| ServiceError::field("customer_id", "Customer not found."))?
                        .customer_id
                }
                (None, Some(walk_in)) => get_or_create_customer(&txn, walk_in).await?.customer_id,
                (None, None) => {
                    return Err(ServiceError::field("customer", "This field is required."))
                }
            };

            let position = enqueue_position(&txn).await?;
            let created = order::ActiveModel {
                order_queue: Set(Some(position)),
                customer_id: Set(customer_id),
                service_id: Set(input.service_id),
                job_specifications: Set(input.job_specifications.clone()),
                status: Set(OrderStatus::Pending),
                deadline: Set(input.deadline),
                payment_id: Set(None),
                created_at: Set(Utc::now()),
                completed_or_cancelled: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            Ok(created)
        }
        .await;

        let created = settle(txn, result).await?;
        info!(order_id = created.order_id, position = ?created.order_queue, "Order queued");
        Ok(created)
    }

    /// Case-insensitive match on service name, customer name or status.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<QueueRow>, ServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{}%", query.to_lowercase());
        let lowered = |col: Expr| Expr::expr(Func::lower(col)).like(pattern.as_str());

        let orders = order::Entity::find()
            .join(JoinType::InnerJoin, order::Relation::Customer.def())
            .join(JoinType::InnerJoin, order::Relation::Service.def())
            .filter(
                Condition::any()
                    .add(lowered(Expr::col((service::Entity, service::Column::Name))))
                    .add(lowered(Expr::col((customer::Entity, customer::Column::Name))))
                    .add(lowered(Expr::col((order::Entity, order::Column::Status)))),
            )
            .order_by_desc(order::Column::CreatedAt)
            .limit(SEARCH_LIMIT)
            .all(&*self.db)
            .await?;

        queue_rows(&*self.db, orders).await
    }
}

/// Walk-in customers are matched on name; a new record takes the form details.
pub async fn get_or_create_customer<C: sea_orm::ConnectionTrait>(
    db: &C,
    input: &CustomerInput,
) -> Result<customer::Model, ServiceError> {
    let name = input.name.trim();
    if let Some(existing) = customer::Entity::find()
        .filter(customer::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    Ok(customer::ActiveModel {
        name: Set(name.to_string()),
        contact_number: Set(input.contact_number.trim().to_string()),
        email: Set(Some(input.email.trim().to_string()).filter(|e| !e.is_empty())),
        address: Set(input.address.clone()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}
