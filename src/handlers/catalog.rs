use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::common::{created_response, message_body, success_response};
use crate::auth::AuthUser;
use crate::dto::{
    CustomizationOptionsQuery, EquipmentInput, PricingOptionsQuery, ServiceInput, SupplierInput,
};
use crate::errors::ServiceError;
use crate::AppState;

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/get-customization-options/", get(customization_options))
        .route("/get-pricing-options/", get(pricing_options))
        .route("/services", get(list_services).post(create_service))
        .route("/equipment", get(list_equipment).post(create_equipment))
        .route("/suppliers", get(list_suppliers).post(create_supplier))
}

async fn customization_options(
    State(state): State<AppState>,
    Query(query): Query<CustomizationOptionsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let options = state
        .services
        .catalog
        .customization_options(query.service_id.as_deref())
        .await?;
    Ok(success_response(json!({ "options": options })))
}

/// Prices for the selected options, keyed by option id.
async fn pricing_options(
    State(state): State<AppState>,
    Query(query): Query<PricingOptionsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let pricing = state.services.catalog.pricing_options(&query).await?;
    Ok(success_response(pricing))
}

async fn list_services(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let services = state.services.catalog.list_services().await?;
    Ok(success_response(json!({ "services": services })))
}

async fn create_service(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<ServiceInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let service = state.services.catalog.create_service(input).await?;
    Ok(created_response(message_body(
        "Service created successfully.",
        json!({ "service": service }),
    )))
}

async fn list_equipment(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let equipment = state.services.catalog.list_equipment().await?;
    Ok(success_response(json!({ "equipment": equipment })))
}

async fn create_equipment(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<EquipmentInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let equipment = state.services.catalog.create_equipment(input).await?;
    Ok(created_response(message_body(
        "Equipment added successfully.",
        json!({ "equipment": equipment }),
    )))
}

async fn list_suppliers(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let suppliers = state.services.catalog.list_suppliers().await?;
    Ok(success_response(json!({ "suppliers": suppliers })))
}

async fn create_supplier(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<SupplierInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let supplier = state.services.catalog.create_supplier(input).await?;
    Ok(created_response(message_body(
        "Supplier added successfully.",
        json!({ "supplier": supplier }),
    )))
}
