pub mod extract;
pub mod token;

pub(crate) use crate::auth::extract::{AuthenticatedStudent, ClientOrigin};
pub(crate) use crate::auth::token::{StudentIdentity, TokenCodec, TokenError};

use crate::errors::ApiError;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Reasons a request fails bearer authentication, all rendered as 401
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidOrExpired,
    #[error("Invalid token")]
    InvalidToken,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::unauthorized(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
