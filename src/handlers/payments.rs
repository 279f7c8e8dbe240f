use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::common::{created_response, message_body, success_response};
use crate::auth::AuthUser;
use crate::dto::{PaymentInput, PaymentListQuery};
use crate::errors::ServiceError;
use crate::AppState;

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/new_payment/", post(create_payment))
        .route("/payments", get(list_payments))
}

async fn create_payment(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<PaymentInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let payment = state.services.payments.create(input).await?;
    Ok(created_response(message_body(
        "Payment recorded successfully.",
        json!({ "payment": payment }),
    )))
}

async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let payments = state.services.payments.list(query.order_id).await?;
    Ok(success_response(json!({ "payments": payments })))
}
