//! Setup wizard. Every screen writes to the caller's staging session only;
//! `save_to_database` turns the whole session into rows in one transaction.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::common::{message_body, success_response};
use crate::auth::AuthUser;
use crate::dto::{
    BusinessDetailsInput, CustomerInput, EquipmentInput, InventoryInput, ServicesAction,
    SupplierInput, SystemSettingsInput, INVENTORY_CATEGORIES,
};
use crate::errors::ServiceError;
use crate::services::setup::{
    apply_services_action, stage_business_details, stage_customer, stage_equipment,
    stage_inventory, stage_supplier, stage_system_settings, COMMIT_FAILURE_MESSAGE,
    COMMIT_SUCCESS_MESSAGE, DASHBOARD_URL,
};
use crate::session::{SessionToken, WizardSession};
use crate::AppState;

pub fn setup_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/setup/business-details/",
            get(business_details).post(save_business_details),
        )
        .route(
            "/setup/services-and-pricing/",
            get(services_and_pricing).post(save_services_and_pricing),
        )
        .route("/setup/equipments/", get(equipment).post(save_equipment))
        .route(
            "/setup/inventory-and-category/",
            get(inventory).post(save_inventory),
        )
        .route("/setup/supplier/", get(supplier).post(save_supplier))
        .route(
            "/setup/customer_prerecords/",
            get(customers).post(save_customer),
        )
        .route(
            "/setup/system_settings/",
            get(system_settings).post(save_system_settings),
        )
        .route("/setup/save_to_database/", post(save_to_database))
}

type SetupResult = Result<(SessionToken, Response), ServiceError>;

async fn staged(state: &AppState, token: &SessionToken) -> Result<WizardSession, ServiceError> {
    state.services.setup.session(token.as_str()).await
}

fn services_view(session: &WizardSession) -> Value {
    json!({
        "services_data": session.services_data,
        "current_service": session.current_service,
        "unlocked": !session.services_data.is_empty(),
    })
}

/// Everything staged, shown before the final save.
fn review(session: &WizardSession) -> Value {
    json!({
        "business_details": session.business_details,
        "services_data": session.services_data,
        "equipment": session.equipment,
        "inventory": session.inventory,
        "supplier": session.supplier,
        "customer": session.customer,
        "system_settings": session.system_settings,
    })
}

async fn business_details(State(state): State<AppState>, token: SessionToken) -> SetupResult {
    let session = staged(&state, &token).await?;
    let body = json!({ "business_details": session.business_details });
    Ok((token, success_response(body)))
}

async fn save_business_details(
    State(state): State<AppState>,
    token: SessionToken,
    Json(input): Json<BusinessDetailsInput>,
) -> SetupResult {
    let (message, session) = state
        .services
        .setup
        .stage(token.as_str(), |session| stage_business_details(session, input))
        .await?;
    let body = message_body(message, json!({ "business_details": session.business_details }));
    Ok((token, success_response(body)))
}

async fn services_and_pricing(State(state): State<AppState>, token: SessionToken) -> SetupResult {
    let session = staged(&state, &token).await?;
    Ok((token, success_response(services_view(&session))))
}

async fn save_services_and_pricing(
    State(state): State<AppState>,
    token: SessionToken,
    Json(action): Json<ServicesAction>,
) -> SetupResult {
    let (message, session) = state
        .services
        .setup
        .stage(token.as_str(), |session| apply_services_action(session, action))
        .await?;
    let body = message_body(message, services_view(&session));
    Ok((token, success_response(body)))
}

async fn equipment(State(state): State<AppState>, token: SessionToken) -> SetupResult {
    let session = staged(&state, &token).await?;
    Ok((token, success_response(json!({ "equipment": session.equipment }))))
}

async fn save_equipment(
    State(state): State<AppState>,
    token: SessionToken,
    Json(input): Json<EquipmentInput>,
) -> SetupResult {
    let (message, session) = state
        .services
        .setup
        .stage(token.as_str(), |session| stage_equipment(session, input))
        .await?;
    let body = message_body(message, json!({ "equipment": session.equipment }));
    Ok((token, success_response(body)))
}

async fn inventory(State(state): State<AppState>, token: SessionToken) -> SetupResult {
    let session = staged(&state, &token).await?;
    let body = json!({
        "categories": INVENTORY_CATEGORIES,
        "inventory": session.inventory,
    });
    Ok((token, success_response(body)))
}

async fn save_inventory(
    State(state): State<AppState>,
    token: SessionToken,
    Json(input): Json<InventoryInput>,
) -> SetupResult {
    let (message, session) = state
        .services
        .setup
        .stage(token.as_str(), |session| stage_inventory(session, input))
        .await?;
    let body = message_body(message, json!({ "inventory": session.inventory }));
    Ok((token, success_response(body)))
}

async fn supplier(State(state): State<AppState>, token: SessionToken) -> SetupResult {
    let session = staged(&state, &token).await?;
    Ok((token, success_response(json!({ "supplier": session.supplier }))))
}

async fn save_supplier(
    State(state): State<AppState>,
    token: SessionToken,
    Json(input): Json<SupplierInput>,
) -> SetupResult {
    let (message, session) = state
        .services
        .setup
        .stage(token.as_str(), |session| stage_supplier(session, input))
        .await?;
    let body = message_body(message, json!({ "supplier": session.supplier }));
    Ok((token, success_response(body)))
}

async fn customers(State(state): State<AppState>, token: SessionToken) -> SetupResult {
    let session = staged(&state, &token).await?;
    Ok((token, success_response(json!({ "customer": session.customer }))))
}

async fn save_customer(
    State(state): State<AppState>,
    token: SessionToken,
    Json(input): Json<CustomerInput>,
) -> SetupResult {
    let (message, session) = state
        .services
        .setup
        .stage(token.as_str(), |session| stage_customer(session, input))
        .await?;
    let body = message_body(message, json!({ "customer": session.customer }));
    Ok((token, success_response(body)))
}

async fn system_settings(State(state): State<AppState>, token: SessionToken) -> SetupResult {
    let session = staged(&state, &token).await?;
    let body = json!({ "system_settings": session.system_settings });
    Ok((token, success_response(body)))
}

async fn save_system_settings(
    State(state): State<AppState>,
    token: SessionToken,
    Json(input): Json<SystemSettingsInput>,
) -> SetupResult {
    let (message, session) = state
        .services
        .setup
        .stage(token.as_str(), |session| stage_system_settings(session, input))
        .await?;
    let body = message_body(message, json!({ "modal_data": review(&session) }));
    Ok((token, success_response(body)))
}

/// Commit the staged session. Failures keep the commit envelope but carry
/// the status of the underlying error.
async fn save_to_database(
    State(state): State<AppState>,
    token: SessionToken,
    user: Option<AuthUser>,
) -> (SessionToken, Response) {
    let user_id = user.map(|u| u.user_id);
    let response = match state.services.setup.commit(token.as_str(), user_id).await {
        Ok(summary) => success_response(message_body(
            COMMIT_SUCCESS_MESSAGE,
            json!({ "redirect_url": DASHBOARD_URL, "summary": summary }),
        )),
        Err(e) => {
            let mut body = json!({
                "success": false,
                "error": e.to_string(),
                "message": COMMIT_FAILURE_MESSAGE,
            });
            if let ServiceError::FormErrors(errors) = &e {
                body["errors"] = json!(errors);
            }
            (e.status_code(), Json(body)).into_response()
        }
    };
    (token, response)
}
