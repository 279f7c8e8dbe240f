use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::production::QualityCheck;

/// Starts production on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionInput {
    pub order: i32,
    #[serde(default)]
    pub materials: Vec<i32>,
    pub equipment_assigned: Option<Value>,
    #[serde(default)]
    pub quality_checks: Vec<QualityCheck>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialsQuery {
    pub equipment_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriorityQuery {
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusFilterQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCheckInput {
    pub parameter: String,
    pub result: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionStatusInput {
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionSearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSupplierInput {
    pub supplier_name: String,
    pub material_name: Option<String>,
    pub message: Option<String>,
}
