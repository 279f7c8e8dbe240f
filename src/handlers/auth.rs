use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::info;
use validator::Validate;

use super::common::success_response;
use crate::auth::AuthUser;
use crate::dto::LoginRequest;
use crate::errors::ServiceError;
use crate::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn superuser_router() -> Router<AppState> {
    Router::new().route("/verify-superuser/", get(verify_superuser))
}

/// Login handler
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let token = state.auth.login(&payload.username, &payload.password).await?;
    info!(username = %payload.username, "Issued access token");
    Ok(success_response(token))
}

/// Whether the bearer may cancel and reorder orders.
pub async fn verify_superuser(user: AuthUser) -> impl IntoResponse {
    success_response(json!({ "is_superuser": user.is_superuser }))
}
