use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use portfolio_core_contact_contracts::{ContactService, ContactSubmitError};

use super::internal_server_error;
use crate::models::contact::{ApiContactForm, ApiContactSubmitResponse, ApiValidationError};

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route("/contact", routing::post(submit))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactService>>,
    Json(form): Json<ApiContactForm>,
) -> Response {
    match service.submit(form.into()).await {
        Ok(outcome) => Json(ApiContactSubmitResponse::from(outcome)).into_response(),
        Err(ContactSubmitError::Validation(fields)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiValidationError {
                detail: "Please fill out all fields.",
                fields,
            }),
        )
            .into_response(),
        Err(ContactSubmitError::Persistence(err)) => {
            internal_server_error(err, "Could not save message")
        }
    }
}
