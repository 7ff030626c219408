//! Critique - constructive AI feedback with per-user history
//!
//! An authenticated user submits free text and receives a natural-language
//! critique. Critiques come from an OpenAI-compatible completion provider
//! when one is configured, and from a fixed set of templates otherwise or
//! whenever the live call fails. Every result is stored, and each user can
//! read back their five most recent records.
//!
//! # Architecture
//!
//! - **Types**: validated input, feedback records and identifiers
//! - **Services**: completion provider client, fallback templates, generator
//! - **Storage**: the `FeedbackStore` contract and its libSQL backend
//! - **Feedback**: the creation/history service tying the two together
//! - **API**: axum routes with JSON envelopes
//! - **Client**: HTTP client keeping a capped local history
//!
//! # Example
//!
//! ```ignore
//! use critique_core::{FeedbackGenerator, FeedbackService, LibsqlStorage, UserId};
//!
//! let store = LibsqlStorage::from_path("critique.db").await?;
//! let generator = FeedbackGenerator::from_config(&config.llm)?;
//! let service = FeedbackService::new(Arc::new(generator), Arc::new(store));
//!
//! let user = UserId::new("user-42")?;
//! let record = service.create(&user, Some("I think renewable energy is important.")).await?;
//! let history = service.history(&user).await?;
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod feedback;
pub mod services;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use client::{FeedbackClient, LocalHistory};
pub use config::CritiqueConfig;
pub use error::{CritiqueError, Result};
pub use feedback::{FeedbackService, HISTORY_LIMIT};
pub use services::{CompletionProvider, FallbackFeedback, FeedbackGenerator};
pub use storage::{
    libsql::{ConnectionMode, LibsqlStorage},
    FeedbackStore,
};
pub use types::{
    FeedbackEntry, FeedbackId, FeedbackRecord, FeedbackText, NewFeedback, UserId, UserInput,
    MAX_INPUT_CHARS,
};
