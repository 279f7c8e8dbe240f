use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entities::{DiscountType, PaymentStatus};

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Ensure this value is greater than or equal to 0.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentInput {
    pub order_id: i32,
    #[validate(custom = "validate_non_negative")]
    pub amount: Decimal,
    #[serde(default)]
    #[validate(custom = "validate_non_negative")]
    pub amount_paid: Decimal,
    pub payment_method_id: Option<i32>,
    #[validate(custom = "validate_non_negative")]
    pub discount: Option<Decimal>,
    pub discount_type: Option<DiscountType>,
    #[validate(length(max = 100))]
    pub discount_name: Option<String>,
    pub status: Option<PaymentStatus>,
    pub payment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentListQuery {
    pub order_id: Option<i32>,
}
