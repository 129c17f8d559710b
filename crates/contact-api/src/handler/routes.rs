//! Route definitions and handlers
//!
//! - `POST /api/contact`: submit the contact form
//! - `GET  /api/contact`: list stored messages (operator token required)
//! - `GET  /health`: liveness and store backend
//! - `GET  /metrics`: Prometheus text exposition

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use contact_core::ContactMessage;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use super::{
    require_operator_token, ApiError, AppState, HealthResponse, SubmitResponse,
    SUBMIT_SUCCESS_MESSAGE,
};

const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let listing = get(list_contacts).route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_operator_token,
    ));

    Router::new()
        .route("/api/contact", post(submit_contact).merge(listing))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /api/contact
///
/// The raw body is validated here rather than through the `Json` extractor
/// so malformed JSON gets the same 400 shape as a bad field. Bodies that
/// cannot be read at all (over the size limit) keep their status code but
/// get the same JSON shape.
pub async fn submit_contact(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("contact_submission", %request_id);

    let body = body.map_err(|rejection| {
        tracing::debug!(
            %request_id,
            status = %rejection.status(),
            "Unreadable contact body"
        );
        ApiError::UnreadableBody {
            status: rejection.status(),
            reason: rejection.body_text(),
        }
    })?;

    let message = state
        .service
        .submit_body(&body)
        .instrument(span)
        .await?;

    Ok(Json(SubmitResponse {
        success: true,
        message: SUBMIT_SUCCESS_MESSAGE.to_string(),
        id: message.id,
    }))
}

/// GET /api/contact
pub async fn list_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("contact_listing", %request_id);

    let messages = state
        .service
        .list()
        .instrument(span)
        .await
        .map_err(|_| ApiError::ListingFailed)?;

    Ok(Json(messages))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.service.store_backend().to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let text = state.metrics.encode_text().map_err(|e| {
        tracing::error!(error = %e, "Failed to encode metrics");
        ApiError::Internal
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        text,
    )
        .into_response())
}
