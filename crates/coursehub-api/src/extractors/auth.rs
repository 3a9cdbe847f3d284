//! `AuthIdentity` extractor: reads the gateway-forwarded identity headers
//! and injects a request context.
//!
//! The upstream gateway authenticates callers and forwards `x-user-id` and
//! `x-user-email`; this core trusts that identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the authenticated user's UUID.
const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's email.
const USER_EMAIL_HEADER: &str = "x-user-email";

/// Extracted authenticated identity available in handlers.
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub RequestContext);

impl std::ops::Deref for AuthIdentity {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing x-user-id header"))?;

        let user_id: Uuid = user_id
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid x-user-id header"))?;

        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing x-user-email header"))?;

        Ok(AuthIdentity(RequestContext::new(user_id, email)))
    }
}
