use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::setup::CustomerInput;
use super::validators::validate_future_deadline;

/// New order. The customer is either an existing id or a walk-in whose
/// record is fetched or created by name.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderInput {
    pub customer_id: Option<i32>,
    pub customer: Option<CustomerInput>,
    #[validate(range(min = 1, message = "Select a valid service."))]
    pub service_id: i32,
    pub job_specifications: Option<Value>,
    #[validate(custom = "validate_future_deadline")]
    pub deadline: DateTime<Utc>,
}

/// Page selector carried by queue mutations and views.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueuePageQuery {
    pub page_pp: Option<String>,
    pub page_cc: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelOrderInput {
    pub page_pp: Option<i64>,
}

/// Inline superuser re-authentication for a cancellation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthorizeCancelInput {
    #[validate(length(min = 1, max = 150, message = "This field is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    pub order_id: Option<i32>,
    pub page_pp: Option<i64>,
}

/// Drag-and-drop result: the order ids of one page, top to bottom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderInput {
    pub order: Vec<i32>,
    pub page_pp: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderSearchQuery {
    #[serde(default)]
    pub query: String,
}
