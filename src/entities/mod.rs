//! Persistent print-shop records.

pub mod audit_log;
pub mod business_details;
pub mod category_equipment;
pub mod customer;
pub mod customization_option;
pub mod equipment;
pub mod inventory;
pub mod inventory_category;
pub mod order;
pub mod payment;
pub mod payment_method;
pub mod pricing_option;
pub mod production;
pub mod production_material;
pub mod service;
pub mod service_customization_option;
pub mod supplier;
pub mod system_settings;

pub use order::OrderStatus;
pub use payment::{DiscountType, PaymentStatus};
pub use production::{ProductionPriority, ProductionStatus};
