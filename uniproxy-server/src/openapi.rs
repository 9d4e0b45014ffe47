use crate::api;
use crate::models::{
    ChangePasswordRequest, ErrorResponse, LoginRequest, MessageResponse, TokenResponse,
};
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const AUTH_TAG: &str = "Auth API";
pub(crate) const STUDENT_TAG: &str = "Student API";

/// Name of the bearer security scheme referenced by protected routes
pub(crate) const BEARER_SCHEME: &str = "bearer";

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::login,
        api::auth::change_password,
        api::student::basic_info,
        api::student::sem_results,
    ),
    components(schemas(
        LoginRequest,
        TokenResponse,
        ChangePasswordRequest,
        MessageResponse,
        ErrorResponse,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = AUTH_TAG, description = "Credential exchange and password change"),
        (name = STUDENT_TAG, description = "Data of the authenticated student"),
    ),
    info(
        title = "University Proxy API",
        description = "Token gateway in front of the university exam cell service",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                BEARER_SCHEME,
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serves the generated OpenAPI document
async fn openapi_json_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates a router for OpenAPI documentation routes
pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json_handler))
}
