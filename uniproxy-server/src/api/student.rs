use crate::auth::AuthenticatedStudent;
use crate::errors::ApiError;
use crate::models::ErrorResponse;
use crate::openapi::STUDENT_TAG;
use crate::state::AppState;
use axum::extract::{Json, State};
use axum::routing::get;
use axum::Router;
use log::info;
use serde_json::Value;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/student/me/info", get(basic_info))
        .route("/student/me/results", get(sem_results))
}

/// Basic profile of the authenticated student, relayed unchanged
#[utoipa::path(
    get,
    path = "/student/me/info",
    tag = STUDENT_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile as returned by the university service", body = Object),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 502, description = "University service error", body = ErrorResponse),
        (status = 503, description = "University service unreachable", body = ErrorResponse)
    )
)]
pub(crate) async fn basic_info(
    State(state): State<AppState>,
    student: AuthenticatedStudent,
) -> Result<Json<Value>, ApiError> {
    info!("Fetching basic info for {}", student.roll_no());
    let info = state
        .university
        .basic_info(&student.claims.identity())
        .await?;
    Ok(Json(info))
}

/// Semester results of the authenticated student, relayed unchanged
#[utoipa::path(
    get,
    path = "/student/me/results",
    tag = STUDENT_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Marks sheet as returned by the university service", body = Object),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 502, description = "University service error", body = ErrorResponse),
        (status = 503, description = "University service unreachable", body = ErrorResponse)
    )
)]
pub(crate) async fn sem_results(
    State(state): State<AppState>,
    student: AuthenticatedStudent,
) -> Result<Json<Value>, ApiError> {
    info!("Fetching semester results for {}", student.roll_no());
    let results = state
        .university
        .sem_results(&student.claims.identity())
        .await?;
    Ok(Json(results))
}
