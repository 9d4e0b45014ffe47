pub(crate) mod auth;
pub(crate) mod health;
pub(crate) mod student;

use crate::errors::ApiError;
use crate::state::AppState;
use crate::upstream::UpstreamError;
use axum::Router;

pub(crate) const UNIVERSITY_UNREACHABLE: &str = "University service unreachable";
pub(crate) const UNIVERSITY_ERROR: &str = "University service error";
pub(crate) const INVALID_UNIVERSITY_RESPONSE: &str = "Invalid response from university service";

/// Combines all API routes into a single router
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(student::router())
}

/// Default translation of upstream failures, used wherever a route has no
/// more specific message to give
impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unreachable(_) => ApiError::service_unavailable(UNIVERSITY_UNREACHABLE),
            UpstreamError::Rejected(_) => ApiError::bad_gateway(UNIVERSITY_ERROR),
            UpstreamError::Malformed(_) => ApiError::bad_gateway(INVALID_UNIVERSITY_RESPONSE),
        }
    }
}
