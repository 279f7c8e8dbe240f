use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::common::{created_response, message_body, success_response};
use crate::auth::AuthUser;
use crate::dto::CustomerInput;
use crate::errors::ServiceError;
use crate::AppState;

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/:id", get(get_customer))
}

async fn list_customers(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let customers = state.services.customers.list().await?;
    Ok(success_response(json!({ "customers": customers })))
}

async fn create_customer(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CustomerInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let customer = state.services.customers.create(input).await?;
    Ok(created_response(message_body(
        "Customer created successfully.",
        json!({ "customer": customer }),
    )))
}

/// A customer with their order and payment history.
async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = state.services.customers.detail(id).await?;
    Ok(success_response(detail))
}
