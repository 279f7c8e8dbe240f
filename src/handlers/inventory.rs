use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::common::{message_body, success_response};
use crate::auth::AuthUser;
use crate::dto::{ContactSupplierInput, MaterialsQuery};
use crate::errors::ServiceError;
use crate::AppState;

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/inventory/management/", get(management))
        .route("/inventory/alerts/", get(alerts))
        .route("/fetch-materials/", get(fetch_materials))
        .route("/contact-supplier/", post(contact_supplier))
}

async fn management(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let categories = state.services.inventory.management().await?;
    Ok(success_response(json!({ "categories": categories })))
}

/// Materials below their reorder threshold.
async fn alerts(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let low_stock = state.services.inventory.alerts().await?;
    Ok(success_response(json!({ "low_stock": low_stock })))
}

async fn fetch_materials(
    State(state): State<AppState>,
    Query(query): Query<MaterialsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let materials = state
        .services
        .inventory
        .materials_for_equipment(query.equipment_name.as_deref())
        .await?;
    Ok(success_response(json!({ "materials": materials })))
}

async fn contact_supplier(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<ContactSupplierInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let supplier = state.services.inventory.contact_supplier(&input).await?;
    Ok(success_response(message_body(
        format!("Request sent to {}.", supplier.supplier_name),
        json!({}),
    )))
}
