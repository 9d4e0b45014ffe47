use crate::auth::ClientOrigin;
use crate::errors::{ApiError, ValidJson};
use crate::models::{
    ChangePasswordRequest, ErrorResponse, LoginRequest, MessageResponse, TokenResponse,
};
use crate::openapi::AUTH_TAG;
use crate::state::AppState;
use crate::upstream::models::{ChangePasswordReply, SignInReply, PASSWORD_CHANGE_FAILED};
use crate::upstream::UpstreamError;
use axum::extract::{Json, State};
use axum::routing::post;
use axum::Router;
use log::{error, info, warn};

pub(crate) const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub(crate) const PASSWORD_SERVICE_UNREACHABLE: &str = "Password change service unreachable";

/// Combines the credential routes into a single router
pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/change-passwd", post(change_password))
}

/// Exchange university credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted by the university service", body = TokenResponse),
        (status = 400, description = "Malformed or incomplete request body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 502, description = "University service returned an unusable response", body = ErrorResponse),
        (status = 503, description = "University service unreachable", body = ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    ClientOrigin(client_ip): ClientOrigin,
    ValidJson(credentials): ValidJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    info!("Login attempt {} IP={}", credentials.username, client_ip);

    let reply = state
        .university
        .sign_in(&credentials.username, &credentials.password, &client_ip)
        .await
        .map_err(|err| match err {
            UpstreamError::Rejected(_) => {
                warn!("Invalid credentials");
                ApiError::unauthorized(INVALID_CREDENTIALS)
            }
            other => ApiError::from(other),
        })?;

    let identity = match reply {
        SignInReply::Identity(identity) => identity,
        SignInReply::Unrecognized => {
            error!("Sign-in response lacks the username or roles");
            return Err(ApiError::from(UpstreamError::Malformed(
                "missing username or roles".to_string(),
            )));
        }
    };

    let token = state.tokens.issue(&identity).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::internal("Failed to issue token")
    })?;

    info!("Issued token for {}", identity.roll_no);
    Ok(Json(TokenResponse::bearer(token)))
}

/// Relay a password change request to the university service
#[utoipa::path(
    post,
    path = "/auth/change-passwd",
    tag = AUTH_TAG,
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Request accepted, message relayed from the university service", body = MessageResponse),
        (status = 400, description = "Request declined by the university service, or malformed request body", body = ErrorResponse),
        (status = 503, description = "Password change service unreachable", body = ErrorResponse)
    )
)]
pub(crate) async fn change_password(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("Password change requested");

    match state.university.change_password(&request.mail).await {
        Ok(ChangePasswordReply::Accepted(message)) => Ok(Json(MessageResponse { message })),
        Ok(ChangePasswordReply::Declined(message)) => {
            warn!("Password change declined: {}", message);
            Err(ApiError::bad_request(message))
        }
        Err(UpstreamError::Unreachable(_)) => {
            Err(ApiError::service_unavailable(PASSWORD_SERVICE_UNREACHABLE))
        }
        Err(UpstreamError::Rejected(status)) => Err(ApiError::new(PASSWORD_CHANGE_FAILED, status)),
        Err(err @ UpstreamError::Malformed(_)) => Err(ApiError::from(err)),
    }
}
