use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Basic health check response
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Health {
    status: String,
}

/// Liveness of the gateway itself, the university service is not probed
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy", body = Health)
    )
)]
pub(crate) async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(Health {
            status: "ok".to_string(),
        }),
    )
}

pub(super) fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
