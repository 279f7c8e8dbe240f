// Order intake and the priority queue
pub mod order_queue;
pub mod orders;

// Setup wizard staging and commit
pub mod setup;

// Catalogue: services, options, pricing, equipment, suppliers
pub mod catalog;

// Shop floor
pub mod inventory;
pub mod production;

// Customer Management
pub mod customers;

// Financial Services
pub mod payments;

pub mod audit;
