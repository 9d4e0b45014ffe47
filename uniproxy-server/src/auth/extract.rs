use crate::auth::token::Claims;
use crate::auth::AuthError;
use crate::state::AppState;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use log::warn;
use std::convert::Infallible;
use std::net::SocketAddr;

/// A student whose bearer token has been verified
#[derive(Debug, Clone)]
pub struct AuthenticatedStudent {
    pub claims: Claims,
}

impl AuthenticatedStudent {
    pub fn roll_no(&self) -> &str {
        &self.claims.roll_no
    }
}

impl FromRequestParts<AppState> for AuthenticatedStudent {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            warn!(
                "Attempt to access {} without a bearer token",
                parts.uri.path()
            );
            AuthError::MissingToken
        })?;

        let claims = state.tokens.verify(token).inspect_err(|_| {
            warn!("Attempt to access {} with an invalid or expired token", parts.uri.path());
        })?;

        // Unreachable for tokens issued by this gateway, which always carry a subject
        if claims.roll_no.trim().is_empty() {
            warn!("Verified token without a subject presented to {}", parts.uri.path());
            return Err(AuthError::InvalidToken);
        }

        Ok(Self { claims })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Network origin of the caller, recorded for audit purposes only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOrigin(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let origin = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(Self(origin))
    }
}
