//! Caller identity
//!
//! Authentication happens upstream. By the time a request reaches us the
//! gateway has resolved the user and put their ID in a trusted header
//! (`x-user-id` by default). Requests without it are rejected with 401.

use super::response::ApiError;
use super::server::AppState;
use crate::types::UserId;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::debug;

/// The authenticated user for this request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(&state.user_header)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                debug!("Request without {} header", state.user_header);
                ApiError::unauthorized()
            })?;

        UserId::new(value)
            .map(AuthenticatedUser)
            .map_err(|_| ApiError::unauthorized())
    }
}
