//! Storage layer for Critique
//!
//! Provides the persistence contract for feedback records and its libSQL
//! implementation.

pub mod libsql;

use crate::error::Result;
use crate::types::{FeedbackEntry, FeedbackRecord, NewFeedback, UserId};
use async_trait::async_trait;

/// Storage backend trait for feedback records
///
/// Records are immutable once written; there is no update or delete.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Persist a record, assigning `id` and `created_at` when unset
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord>;

    /// At most `limit` records owned by `user_id`, newest first.
    /// Ties on `created_at` resolve to the most recently inserted record.
    async fn find_recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<FeedbackEntry>>;
}
