use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::validators::*;

/// Screen 1: business identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BusinessDetailsInput {
    #[validate(
        length(min = 1, max = 255, message = "This field is required."),
        custom = "validate_business_name"
    )]
    pub business_name: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub business_address: String,
    #[validate(custom = "validate_business_contact")]
    pub contact_number: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(custom = "validate_tin")]
    pub tin: Option<String>,
    /// Path or URL of an already uploaded logo.
    pub logo: Option<String>,
}

/// Screen 2, `add_service`: a service and the names of its customization options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ServiceInput {
    #[validate(custom = "validate_service_name")]
    pub name: String,
    #[serde(default)]
    #[validate(custom = "validate_customization_options")]
    pub customization_options: Vec<String>,
}

/// Screen 2, `add_pricing_option`. Fields stay loose so each problem maps to
/// its own message instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingOptionInput {
    pub service_index: Option<Value>,
    pub customization_option: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: Option<Decimal>,
}

impl PricingOptionInput {
    /// Index as submitted: a JSON integer or a numeric string.
    pub fn parsed_index(&self) -> Option<usize> {
        match self.service_index.as_ref()? {
            Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Screen 2 actions, selected by the `action` tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ServicesAction {
    AddService(ServiceInput),
    AddPricingOption(PricingOptionInput),
    SaveService,
    RevertToService,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedPricing {
    pub description: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedOption {
    pub name: String,
    #[serde(default)]
    pub pricing_options: Vec<StagedPricing>,
}

/// A service as held in the wizard session, options nested with their prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedService {
    pub name: String,
    #[serde(default)]
    pub customization_options: Vec<StagedOption>,
}

impl From<ServiceInput> for StagedService {
    fn from(input: ServiceInput) -> Self {
        StagedService {
            name: input.name,
            customization_options: input
                .customization_options
                .into_iter()
                .map(|name| StagedOption {
                    name,
                    pricing_options: Vec::new(),
                })
                .collect(),
        }
    }
}

impl StagedService {
    /// The form view of this service, for re-validation.
    pub fn as_input(&self) -> ServiceInput {
        ServiceInput {
            name: self.name.clone(),
            customization_options: self
                .customization_options
                .iter()
                .map(|option| option.name.clone())
                .collect(),
        }
    }
}

/// Screen 3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EquipmentInput {
    #[validate(length(max = 255), custom = "validate_equipment_name")]
    pub name: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub description: String,
    #[validate(custom = "validate_condition")]
    pub condition: String,
    /// Inventory categories this equipment consumes from.
    #[serde(default)]
    #[validate(custom = "validate_categories")]
    pub categories: Vec<String>,
}

/// Screen 4: a material filed under one of the fixed categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct InventoryInput {
    #[validate(length(min = 1, max = 100, message = "This field is required."))]
    pub name: String,
    #[validate(custom = "validate_category")]
    pub category: String,
    #[validate(length(max = 255))]
    pub supplier: Option<String>,
    #[validate(range(min = 0, message = "Stock level cannot be negative."))]
    pub stock_level: i32,
    #[validate(range(min = 0, message = "Reorder threshold cannot be negative."))]
    pub reorder_threshold: i32,
    #[serde(default = "default_unit")]
    #[validate(custom = "validate_unit")]
    pub unit_of_measurement: String,
}

fn default_unit() -> String {
    "qty".to_string()
}

/// Screen 5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SupplierInput {
    #[validate(length(min = 1, max = 100, message = "This field is required."))]
    pub supplier_name: String,
    #[validate(length(max = 100))]
    pub contact_person: Option<String>,
    #[validate(custom = "validate_supplier_phone")]
    pub phone_number: Option<String>,
    #[validate(custom = "validate_email_format")]
    pub email: Option<String>,
    pub address: Option<String>,
    pub additional_info: Option<String>,
}

/// Screen 6, also used for walk-in customers on order creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CustomerInput {
    #[validate(length(max = 100), custom = "validate_customer_name")]
    pub name: String,
    #[validate(custom = "validate_customer_contact")]
    pub contact_number: String,
    #[validate(custom = "validate_email_format")]
    pub email: String,
    pub address: Option<String>,
}

/// Screen 7: outbound mail settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SystemSettingsInput {
    #[validate(length(min = 1, max = 255, message = "This field is required."))]
    pub smtp_server: String,
    #[validate(custom = "validate_smtp_port")]
    pub smtp_port: i32,
    #[validate(email(message = "Enter a valid email address."), custom = "validate_gmail")]
    pub smtp_email: String,
    #[validate(custom = "validate_app_password")]
    pub smtp_password: String,
}
