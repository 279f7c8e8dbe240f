//! Dense 1..N ordering of active orders.
//!
//! Planning is done by the pure functions at the top of this module; the
//! service applies a plan inside one transaction so the terminal update and
//! the renumber of the remaining orders land together.

use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::auth::AuthUser;
use crate::db::settle;
use crate::entities::{customer, order, service, OrderStatus};
use crate::errors::ServiceError;
use crate::services::audit;

/// Position for an order appended behind `current_max`.
pub fn next_position(current_max: Option<i32>) -> i32 {
    current_max.map_or(1, |max| max + 1)
}

/// `(order_id, position)` pairs numbering `ordered` from 1.
pub fn renumber(ordered: &[i32]) -> Vec<(i32, i32)> {
    ordered
        .iter()
        .zip(1..)
        .map(|(order_id, position)| (*order_id, position))
        .collect()
}

/// Move the submitted ids, in submitted order, to the slot where page `page`
/// starts. Every other active order keeps its relative position.
pub fn splice_page(
    active: &[i32],
    submitted: &[i32],
    page: u64,
    per_page: u64,
) -> Result<Vec<i32>, ServiceError> {
    let mut seen = HashSet::with_capacity(submitted.len());
    for order_id in submitted {
        if !seen.insert(*order_id) {
            return Err(ServiceError::InvalidInput(format!(
                "Order {} was submitted more than once.",
                order_id
            )));
        }
        if !active.contains(order_id) {
            return Err(ServiceError::InvalidInput(format!(
                "Order {} is not in the active queue.",
                order_id
            )));
        }
    }

    let mut ordered: Vec<i32> = active
        .iter()
        .copied()
        .filter(|order_id| !seen.contains(order_id))
        .collect();
    let offset = page.saturating_sub(1).saturating_mul(per_page);
    let offset = usize::try_from(offset).unwrap_or(usize::MAX).min(ordered.len());
    ordered.splice(offset..offset, submitted.iter().copied());
    Ok(ordered)
}

/// 1-based page for a raw `?page=` value. Garbage means the first page,
/// out-of-range numbers the last one.
pub fn resolve_page(raw: Option<&str>, total_pages: u64) -> u64 {
    let last = total_pages.max(1);
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => 1,
        Some(s) => match s.parse::<i64>() {
            Err(_) => 1,
            Ok(n) if n < 1 => last,
            Ok(n) => u64::try_from(n).map_or(last, |n| n.min(last)),
        },
    }
}

/// One order as shown in a queue listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueRow {
    pub order_id: i32,
    pub order_queue: Option<i32>,
    pub customer_id: i32,
    pub customer_name: String,
    pub service_id: i32,
    pub service_name: String,
    pub status: OrderStatus,
    pub deadline: DateTime<Utc>,
    pub job_specifications: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub completed_or_cancelled: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuePage {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub orders: Vec<QueueRow>,
}

fn active_orders() -> Select<order::Entity> {
    order::Entity::find()
        .filter(order::Column::Status.is_in(OrderStatus::ACTIVE))
        .order_by_asc(order::Column::OrderQueue)
        .order_by_asc(order::Column::OrderId)
}

/// Highest queue position among active orders plus one.
pub async fn enqueue_position<C: ConnectionTrait>(db: &C) -> Result<i32, ServiceError> {
    let current_max = order::Entity::find()
        .select_only()
        .column_as(order::Column::OrderQueue.max(), "max_queue")
        .filter(order::Column::Status.is_in(OrderStatus::ACTIVE))
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    Ok(next_position(current_max))
}

async fn write_positions<C: ConnectionTrait>(
    db: &C,
    current: &HashMap<i32, Option<i32>>,
    ordered: &[i32],
) -> Result<(), ServiceError> {
    for (order_id, position) in renumber(ordered) {
        if current.get(&order_id).copied().flatten() == Some(position) {
            continue;
        }
        order::Entity::update_many()
            .col_expr(order::Column::OrderQueue, Expr::value(position))
            .filter(order::Column::OrderId.eq(order_id))
            .exec(db)
            .await?;
    }
    Ok(())
}

async fn active_snapshot<C: ConnectionTrait>(
    db: &C,
) -> Result<(Vec<i32>, HashMap<i32, Option<i32>>), ServiceError> {
    let rows = active_orders()
        .select_only()
        .column(order::Column::OrderId)
        .column(order::Column::OrderQueue)
        .into_tuple::<(i32, Option<i32>)>()
        .all(db)
        .await?;
    let ordered = rows.iter().map(|(order_id, _)| *order_id).collect();
    Ok((ordered, rows.into_iter().collect()))
}

/// Close the gaps left by a terminal transition.
pub async fn renumber_active<C: ConnectionTrait>(db: &C) -> Result<(), ServiceError> {
    let (ordered, current) = active_snapshot(db).await?;
    write_positions(db, &current, &ordered).await
}

/// Move a pending order to IN PROGRESS. Its position is kept.
pub async fn mark_in_progress<C: ConnectionTrait>(
    db: &C,
    order_id: i32,
) -> Result<(), ServiceError> {
    order::Entity::update_many()
        .col_expr(order::Column::Status, Expr::value(OrderStatus::InProgress))
        .filter(order::Column::OrderId.eq(order_id))
        .filter(order::Column::Status.eq(OrderStatus::Pending))
        .exec(db)
        .await?;
    Ok(())
}

/// Attach customer and service names to a batch of orders.
pub async fn queue_rows<C: ConnectionTrait>(
    db: &C,
    orders: Vec<order::Model>,
) -> Result<Vec<QueueRow>, ServiceError> {
    let customer_ids: HashSet<i32> = orders.iter().map(|o| o.customer_id).collect();
    let service_ids: HashSet<i32> = orders.iter().map(|o| o.service_id).collect();

    let customers: HashMap<i32, String> = customer::Entity::find()
        .filter(customer::Column::CustomerId.is_in(customer_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.customer_id, c.name))
        .collect();
    let services: HashMap<i32, String> = service::Entity::find()
        .filter(service::Column::ServiceId.is_in(service_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.service_id, s.name))
        .collect();

    Ok(orders
        .into_iter()
        .map(|o| QueueRow {
            order_id: o.order_id,
            order_queue: o.order_queue,
            customer_id: o.customer_id,
            customer_name: customers.get(&o.customer_id).cloned().unwrap_or_default(),
            service_id: o.service_id,
            service_name: services.get(&o.service_id).cloned().unwrap_or_default(),
            status: o.status,
            deadline: o.deadline,
            job_specifications: o.job_specifications,
            created_at: o.created_at,
            completed_or_cancelled: o.completed_or_cancelled,
        })
        .collect())
}

#[derive(Clone)]
pub struct OrderQueueService {
    db: Arc<DatabaseConnection>,
    page_size: u64,
}

impl OrderQueueService {
    pub fn new(db: Arc<DatabaseConnection>, page_size: u64) -> Self {
        Self {
            db,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Cancel any order that is not already cancelled and renumber the rest.
    /// Superusers only.
    #[instrument(skip(self, actor), fields(user = %actor.username))]
    pub async fn cancel(
        &self,
        order_id: i32,
        actor: &AuthUser,
    ) -> Result<order::Model, ServiceError> {
        actor.require_superuser("You are not authorized to cancel this order.")?;
        self.terminate(order_id, OrderStatus::Cancelled, actor).await
    }

    /// Complete an active order and renumber the rest. Superusers only.
    #[instrument(skip(self, actor), fields(user = %actor.username))]
    pub async fn complete(
        &self,
        order_id: i32,
        actor: &AuthUser,
    ) -> Result<order::Model, ServiceError> {
        actor.require_superuser("You are not authorized to complete this order.")?;
        self.terminate(order_id, OrderStatus::Completed, actor).await
    }

    async fn terminate(
        &self,
        order_id: i32,
        target: OrderStatus,
        actor: &AuthUser,
    ) -> Result<order::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let result: Result<order::Model, ServiceError> = async {
            let found = order::Entity::find_by_id(order_id)
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound("Order not found.".to_string()))?;

            match (found.status, target) {
                (OrderStatus::Cancelled, OrderStatus::Cancelled) => {
                    return Err(ServiceError::Conflict(
                        "This order has already been cancelled.".to_string(),
                    ))
                }
                (OrderStatus::Completed, OrderStatus::Completed) => {
                    return Err(ServiceError::Conflict(
                        "This order has already been completed.".to_string(),
                    ))
                }
                // A completed job can still be voided.
                (OrderStatus::Completed, OrderStatus::Cancelled) => {}
                (status, _) if !status.is_active() => {
                    return Err(ServiceError::Conflict(format!(
                        "A {} order cannot change state.",
                        status.to_string().to_lowercase()
                    )))
                }
                _ => {}
            }

            let mut active: order::ActiveModel = found.into();
            active.status = Set(target);
            active.order_queue = Set(None);
            active.completed_or_cancelled = Set(Some(Utc::now()));
            let updated = active.update(&txn).await?;

            renumber_active(&txn).await?;
            audit::record(
                &txn,
                Some(actor.user_id),
                format!(
                    "Order #{} marked {} by {}",
                    order_id,
                    target.to_string().to_lowercase(),
                    actor.username
                ),
            )
            .await?;
            Ok(updated)
        }
        .await;

        let updated = settle(txn, result).await?;
        info!(order_id, status = %updated.status, "Order left the queue");
        Ok(updated)
    }

    /// Re-slot the orders shown on page `page` in the submitted order and
    /// renumber the whole queue. Superusers only.
    #[instrument(
        skip(self, actor, submitted),
        fields(user = %actor.username, count = submitted.len())
    )]
    pub async fn reorder_page(
        &self,
        submitted: &[i32],
        page: Option<i64>,
        actor: &AuthUser,
    ) -> Result<(), ServiceError> {
        actor.require_superuser("You are not authorized to reorder the queue.")?;
        let page = page.and_then(|p| u64::try_from(p).ok()).filter(|p| *p >= 1).unwrap_or(1);

        let txn = self.db.begin().await?;
        let result: Result<(), ServiceError> = async {
            let (active, current) = active_snapshot(&txn).await?;
            let ordered = splice_page(&active, submitted, page, self.page_size).map_err(|e| {
                warn!(error = %e, "Rejected queue reorder");
                e
            })?;
            write_positions(&txn, &current, &ordered).await?;
            audit::record(
                &txn,
                Some(actor.user_id),
                format!("Order queue page {} reordered by {}", page, actor.username),
            )
            .await
        }
        .await;
        settle(txn, result).await
    }

    /// Active orders by queue position.
    pub async fn queue_page(&self, raw_page: Option<&str>) -> Result<QueuePage, ServiceError> {
        self.paginate(active_orders(), raw_page).await
    }

    /// Completed and cancelled orders, most recent first.
    pub async fn terminal_page(&self, raw_page: Option<&str>) -> Result<QueuePage, ServiceError> {
        let select = order::Entity::find()
            .filter(order::Column::Status.is_in(OrderStatus::TERMINAL))
            .order_by_desc(order::Column::CompletedOrCancelled)
            .order_by_desc(order::Column::OrderId);
        self.paginate(select, raw_page).await
    }

    async fn paginate(
        &self,
        select: Select<order::Entity>,
        raw_page: Option<&str>,
    ) -> Result<QueuePage, ServiceError> {
        let db = &*self.db;
        let paginator = select.paginate(db, self.page_size);
        let counts = paginator.num_items_and_pages().await?;
        let page = resolve_page(raw_page, counts.number_of_pages);
        let orders = paginator.fetch_page(page - 1).await?;

        Ok(QueuePage {
            page,
            per_page: self.page_size,
            total: counts.number_of_items,
            total_pages: counts.number_of_pages.max(1),
            orders: queue_rows(db, orders).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn appended_orders_go_to_the_back() {
        assert_eq!(next_position(None), 1);
        assert_eq!(next_position(Some(7)), 8);
    }

    #[test]
    fn renumber_is_dense_from_one() {
        assert_eq!(renumber(&[9, 3, 5]), vec![(9, 1), (3, 2), (5, 3)]);
        assert!(renumber(&[]).is_empty());
    }

    #[test]
    fn exact_page_resubmission_matches_page_relative_numbering() {
        let active: Vec<i32> = (1..=25).collect();
        let page_two: Vec<i32> = (11..=20).rev().collect();
        let ordered = splice_page(&active, &page_two, 2, 10).unwrap();

        assert_eq!(&ordered[..10], &active[..10]);
        assert_eq!(&ordered[10..20], page_two.as_slice());
        assert_eq!(&ordered[20..], &active[20..]);
    }

    #[test]
    fn partial_submission_lands_at_page_start() {
        let ordered = splice_page(&[1, 2, 3, 4, 5], &[5, 4], 1, 10).unwrap();
        assert_eq!(ordered, vec![5, 4, 1, 2, 3]);
    }

    #[test]
    fn page_beyond_the_end_appends() {
        let ordered = splice_page(&[1, 2, 3], &[1], 4, 10).unwrap();
        assert_eq!(ordered, vec![2, 3, 1]);
    }

    #[test]
    fn unknown_and_duplicate_ids_are_rejected() {
        assert_matches!(
            splice_page(&[1, 2, 3], &[4], 1, 10),
            Err(ServiceError::InvalidInput(_))
        );
        assert_matches!(
            splice_page(&[1, 2, 3], &[2, 2], 1, 10),
            Err(ServiceError::InvalidInput(_))
        );
    }

    #[test]
    fn page_resolution_clamps() {
        assert_eq!(resolve_page(None, 3), 1);
        assert_eq!(resolve_page(Some("abc"), 3), 1);
        assert_eq!(resolve_page(Some("2"), 3), 2);
        assert_eq!(resolve_page(Some("9"), 3), 3);
        assert_eq!(resolve_page(Some("0"), 3), 3);
        assert_eq!(resolve_page(Some("1"), 0), 1);
    }
}
