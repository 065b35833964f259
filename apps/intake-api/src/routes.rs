//! HTTP routes.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use intake_core::{Dispatch, OrderConfirmation, OrderRequest};
use tracing::{error, info};

use crate::error::ApiError;
use crate::AppState;

/// Builds the service router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route("/api/ReceiveOrder", post(receive_order))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Health check endpoint.
async fn health_handler() -> impl IntoResponse {
    "OK"
}

/// Accepts one order and answers with its confirmation.
///
/// The body is read raw so that a missing or non-JSON content type is treated
/// the same as malformed JSON.
async fn receive_order(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<OrderConfirmation>, ApiError> {
    info!("Received an order request.");

    let order: OrderRequest = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, bytes = body.len(), "Order payload rejected");
        ApiError::malformed()
    })?;

    let outcome = state.intake.receive(&order);

    match outcome.dispatch {
        Dispatch::Failed(e) => Err(ApiError::publish_unavailable(e)),
        Dispatch::Submitted | Dispatch::NotSubmitted => Ok(Json(outcome.confirmation)),
    }
}
