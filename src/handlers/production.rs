use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::common::{created_response, message_body, success_response};
use crate::auth::AuthUser;
use crate::dto::{
    PriorityQuery, ProductionInput, ProductionSearchQuery, ProductionStatusInput,
    QualityCheckInput, StatusFilterQuery,
};
use crate::errors::ServiceError;
use crate::AppState;

pub fn production_routes() -> Router<AppState> {
    Router::new()
        .route("/submit-production/", post(submit_production))
        .route("/filter/production-by-priority/", get(by_priority))
        .route("/filter/production-by-status/", get(by_status))
        .route("/fetch/quality-checks/:production_id/", get(quality_checks))
        .route("/get_quality_check/:job_id/:parameter/", get(quality_check))
        .route("/save_quality_check/:job_id/:parameter/", post(save_quality_check))
        .route("/production/:job_id/status/", post(update_status))
        .route("/production/search/", get(search))
}

async fn submit_production(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<ProductionInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let production = state.services.production.submit(input).await?;
    Ok(created_response(message_body(
        "Production submitted successfully.",
        json!({ "production": production }),
    )))
}

async fn by_priority(
    State(state): State<AppState>,
    Query(query): Query<PriorityQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let productions = state
        .services
        .production
        .by_priority(query.priority.as_deref())
        .await?;
    Ok(success_response(json!({ "productions": productions })))
}

async fn by_status(
    State(state): State<AppState>,
    Query(query): Query<StatusFilterQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let productions = state
        .services
        .production
        .by_status(query.status.as_deref(), query.priority.as_deref())
        .await?;
    Ok(success_response(json!({ "productions": productions })))
}

async fn quality_checks(
    State(state): State<AppState>,
    Path(production_id): Path<i32>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let checks = state.services.production.quality_checks(production_id).await?;
    Ok(success_response(checks))
}

async fn quality_check(
    State(state): State<AppState>,
    Path((job_id, parameter)): Path<(i32, String)>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let check = state
        .services
        .production
        .quality_check(job_id, &parameter)
        .await?;
    Ok(success_response(check))
}

async fn save_quality_check(
    State(state): State<AppState>,
    Path((job_id, parameter)): Path<(i32, String)>,
    _user: AuthUser,
    Json(input): Json<QualityCheckInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let save_type = state
        .services
        .production
        .save_quality_check(job_id, &parameter, input)
        .await?;
    Ok(success_response(message_body(
        "Quality check saved successfully.",
        json!({ "save_type": save_type.to_string() }),
    )))
}

async fn update_status(
    State(state): State<AppState>,
    Path(job_id): Path<i32>,
    _user: AuthUser,
    Json(input): Json<ProductionStatusInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let production = state
        .services
        .production
        .update_status(job_id, &input.status)
        .await?;
    Ok(success_response(message_body(
        "Production status updated successfully.",
        json!({ "production": production }),
    )))
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<ProductionSearchQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let job_ids = state.services.production.search(&query.q).await?;
    Ok(success_response(json!({ "job_ids": job_ids })))
}
