pub mod auth;
pub mod catalog;
pub mod common;
pub mod customers;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod payments;
pub mod production;
pub mod setup;

use crate::db::DbPool;
use crate::services::{
    catalog::CatalogService, customers::CustomerService, inventory::InventoryService,
    order_queue::OrderQueueService, orders::OrderService, payments::PaymentService,
    production::ProductionService, setup::SetupService,
};
use crate::session::SessionStore;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub order_queue: Arc<OrderQueueService>,
    pub orders: Arc<OrderService>,
    pub setup: Arc<SetupService>,
    pub catalog: Arc<CatalogService>,
    pub inventory: Arc<InventoryService>,
    pub production: Arc<ProductionService>,
    pub customers: Arc<CustomerService>,
    pub payments: Arc<PaymentService>,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        sessions: Arc<dyn SessionStore>,
        queue_page_size: u64,
        clear_session_on_commit: bool,
    ) -> Self {
        Self {
            order_queue: Arc::new(OrderQueueService::new(db_pool.clone(), queue_page_size)),
            orders: Arc::new(OrderService::new(db_pool.clone())),
            setup: Arc::new(SetupService::new(
                db_pool.clone(),
                sessions,
                clear_session_on_commit,
            )),
            catalog: Arc::new(CatalogService::new(db_pool.clone())),
            inventory: Arc::new(InventoryService::new(db_pool.clone())),
            production: Arc::new(ProductionService::new(db_pool.clone())),
            customers: Arc::new(CustomerService::new(db_pool.clone())),
            payments: Arc::new(PaymentService::new(db_pool)),
        }
    }
}
