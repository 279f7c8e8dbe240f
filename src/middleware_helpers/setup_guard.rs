use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::errors::ServiceError;
use crate::AppState;

pub const SETUP_COMPLETE_MESSAGE: &str = "Setup has already been completed.";

/// Close the setup wizard once the shop has been configured.
pub async fn setup_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match state.services.setup.is_setup_complete().await {
        Ok(false) => next.run(request).await,
        Ok(true) => {
            warn!(uri = %request.uri(), "Setup wizard request after setup was completed");
            ServiceError::Conflict(SETUP_COMPLETE_MESSAGE.to_string()).into_response()
        }
        Err(e) => e.into_response(),
    }
}
