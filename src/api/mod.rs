//! HTTP API for feedback creation and history
//!
//! Provides:
//! - JSON envelopes and error mapping
//! - Upstream identity extraction
//! - The axum router and server

pub mod auth;
pub mod response;
pub mod server;

pub use auth::AuthenticatedUser;
pub use response::{ApiError, ApiResponse};
pub use server::{router, ApiServer, ApiServerConfig, AppState, HealthResponse};
