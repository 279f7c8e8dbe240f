//! Request payloads and their form validation rules.

pub mod auth;
pub mod catalog;
pub mod orders;
pub mod payments;
pub mod production;
pub mod setup;
mod validators;

pub use auth::*;
pub use catalog::*;
pub use orders::*;
pub use payments::*;
pub use production::*;
pub use setup::*;
pub use validators::{INVENTORY_CATEGORIES, MAX_CUSTOMIZATION_OPTIONS};
