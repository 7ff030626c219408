//! HTTP API server
//!
//! Routes:
//! - `POST /feedback` create a feedback record for the caller
//! - `GET /feedback/history` the caller's newest records
//! - `GET /health` liveness, no identity required

use super::auth::AuthenticatedUser;
use super::response::{
    ApiError, ApiResponse, CREATED_MESSAGE, CREATE_FAILED_MESSAGE, HISTORY_FAILED_MESSAGE,
    INVALID_BODY_MESSAGE,
};
use crate::error::CritiqueError;
use crate::feedback::FeedbackService;
use crate::types::FeedbackEntry;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderName, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server address
    pub addr: SocketAddr,
    /// Header carrying the upstream-authenticated user ID
    pub user_header: String,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 5000).into(),
            user_header: "x-user-id".to_string(),
        }
    }
}

/// API server state
#[derive(Clone)]
pub struct AppState {
    pub(crate) service: Arc<FeedbackService>,
    pub(crate) user_header: HeaderName,
}

impl AppState {
    /// Fails when `user_header` is not a valid HTTP header name
    pub fn new(service: Arc<FeedbackService>, user_header: &str) -> crate::error::Result<Self> {
        let user_header = HeaderName::from_str(user_header.trim()).map_err(|e| {
            CritiqueError::Config(config::ConfigError::Message(format!(
                "Invalid auth.user_header '{}': {}",
                user_header, e
            )))
        })?;

        Ok(Self {
            service,
            user_header,
        })
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/feedback", post(create_feedback_handler))
        .route("/feedback/history", get(history_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    service: Arc<FeedbackService>,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, service: Arc<FeedbackService>) -> Self {
        Self { config, service }
    }

    pub fn router(&self) -> crate::error::Result<Router> {
        Ok(router(AppState::new(
            self.service.clone(),
            &self.config.user_header,
        )?))
    }

    /// Bind and serve until the task is dropped
    ///
    /// Configuration errors surface before the listener is bound.
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = self.router()?;
        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;

        info!(
            "API server listening on http://{} (live generation: {})",
            self.config.addr,
            self.service.generator().is_live()
        );

        axum::serve(listener, router).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateFeedbackRequest {
    #[serde(default)]
    pub user_input: Option<String>,
}

async fn create_feedback_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    payload: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<FeedbackEntry>>), ApiError> {
    let Json(request) = payload.map_err(|e| {
        debug!("Rejected feedback request body: {}", e);
        ApiError::bad_request(INVALID_BODY_MESSAGE)
    })?;

    let record = state
        .service
        .create(&user_id, request.user_input.as_deref())
        .await
        .map_err(|e| ApiError::from_service(e, CREATE_FAILED_MESSAGE))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(record.entry()).with_message(CREATED_MESSAGE)),
    ))
}

async fn history_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<FeedbackEntry>>>, ApiError> {
    let history = state
        .service
        .history(&user_id)
        .await
        .map_err(|e| ApiError::from_service(e, HISTORY_FAILED_MESSAGE))?;

    Ok(Json(ApiResponse::ok(history)))
}

/// Health check handler
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
