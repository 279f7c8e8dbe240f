use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::warn;
use validator::Validate;

use super::common::{created_response, message_body, success_response};
use crate::auth::{AuthError, AuthUser};
use crate::dto::{
    AuthorizeCancelInput, CancelOrderInput, OrderInput, OrderSearchQuery, QueuePageQuery,
    ReorderInput,
};
use crate::errors::ServiceError;
use crate::services::order_queue::QueuePage;
use crate::AppState;

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/search/", get(search_orders))
        .route("/orders/update_order_queue/", post(update_order_queue))
        .route("/orders/:order_id/cancel/", post(cancel_order))
        .route("/orders/:order_id/complete/", post(complete_order))
        .route("/authorize-cancel/", post(authorize_cancel))
        .route("/refresh-order-queue/", get(refresh_order_queue))
        .route("/get_paginated_orders/", get(paginated_orders))
}

fn page_param(page: Option<i64>) -> Option<String> {
    page.map(|p| p.to_string())
}

async fn active_page(state: &AppState, page: Option<&str>) -> Result<QueuePage, ServiceError> {
    state.services.order_queue.queue_page(page).await
}

/// Active queue and terminal history, one page each.
async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<QueuePageQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let queue = &state.services.order_queue;
    let orders_queue = queue.queue_page(query.page_pp.as_deref()).await?;
    let completed_orders = queue.terminal_page(query.page_cc.as_deref()).await?;
    Ok(success_response(json!({
        "orders_queue": orders_queue,
        "completed_orders": completed_orders,
    })))
}

async fn create_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<OrderInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.create(input).await?;
    Ok(created_response(message_body(
        "Order created successfully.",
        json!({ "order": order }),
    )))
}

async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    Query(query): Query<CancelOrderInput>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.order_queue.cancel(order_id, &user).await?;
    let orders_queue = active_page(&state, page_param(query.page_pp).as_deref()).await?;
    Ok(success_response(message_body(
        format!("Order #{} has been cancelled.", order_id),
        json!({ "orders_queue": orders_queue }),
    )))
}

async fn complete_order(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    Query(query): Query<CancelOrderInput>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.order_queue.complete(order_id, &user).await?;
    let orders_queue = active_page(&state, page_param(query.page_pp).as_deref()).await?;
    Ok(success_response(message_body(
        format!("Order #{} has been completed.", order_id),
        json!({ "orders_queue": orders_queue }),
    )))
}

/// Cancel on behalf of a superuser who re-enters their credentials.
async fn authorize_cancel(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<AuthorizeCancelInput>,
) -> Result<impl IntoResponse, ServiceError> {
    input.validate()?;
    let approver = state
        .auth
        .verify_superuser(&input.username, &input.password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials | AuthError::InsufficientPermissions => {
                warn!(username = %input.username, "Rejected cancellation approval");
                ServiceError::Forbidden("Invalid superuser credentials.".to_string())
            }
            other => other.into(),
        })?;

    let order_id = input
        .order_id
        .ok_or_else(|| ServiceError::BadRequest("Order ID is required.".to_string()))?;

    let approver = AuthUser::from_account(&approver);
    state.services.order_queue.cancel(order_id, &approver).await?;
    let orders_queue = active_page(&state, page_param(input.page_pp).as_deref()).await?;
    Ok(success_response(message_body(
        format!("Order #{} has been cancelled.", order_id),
        json!({ "orders_queue": orders_queue }),
    )))
}

async fn update_order_queue(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ReorderInput>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .order_queue
        .reorder_page(&input.order, input.page_pp, &user)
        .await?;
    let orders_queue = active_page(&state, page_param(input.page_pp).as_deref()).await?;
    Ok(success_response(message_body(
        "Order queue updated successfully.",
        json!({ "orders_queue": orders_queue }),
    )))
}

async fn refresh_order_queue(
    State(state): State<AppState>,
    Query(query): Query<QueuePageQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let orders_queue = active_page(&state, query.page_pp.as_deref()).await?;
    Ok(success_response(json!({ "orders_queue": orders_queue })))
}

/// `page_cc` selects the completed/cancelled listing, anything else the queue.
async fn paginated_orders(
    State(state): State<AppState>,
    Query(query): Query<QueuePageQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let queue = &state.services.order_queue;
    if let Some(page_cc) = query.page_cc.as_deref() {
        let completed_orders = queue.terminal_page(Some(page_cc)).await?;
        return Ok(success_response(json!({ "completed_orders": completed_orders })));
    }
    let orders_queue = queue.queue_page(query.page_pp.as_deref()).await?;
    Ok(success_response(json!({ "orders_queue": orders_queue })))
}

async fn search_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderSearchQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let orders = state.services.orders.search(&query.query).await?;
    Ok(success_response(json!({ "orders": orders })))
}
