//! Feedback creation and history
//!
//! [`FeedbackService`] validates input, asks the generator for a critique and
//! persists the result. History is always the newest [`HISTORY_LIMIT`]
//! records for the caller.

use crate::error::Result;
use crate::services::FeedbackGenerator;
use crate::storage::FeedbackStore;
use crate::types::{FeedbackEntry, FeedbackRecord, NewFeedback, UserId, UserInput};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Number of records returned by a history query
pub const HISTORY_LIMIT: usize = 5;

pub struct FeedbackService {
    generator: Arc<FeedbackGenerator>,
    store: Arc<dyn FeedbackStore>,
}

impl FeedbackService {
    pub fn new(generator: Arc<FeedbackGenerator>, store: Arc<dyn FeedbackStore>) -> Self {
        Self { generator, store }
    }

    pub fn generator(&self) -> &FeedbackGenerator {
        &self.generator
    }

    /// Validate, generate and persist
    ///
    /// Invalid input is rejected before the generator or the store is touched.
    /// Generation cannot fail; store failures are logged and propagated.
    pub async fn create(&self, user_id: &UserId, raw_input: Option<&str>) -> Result<FeedbackRecord> {
        let input = UserInput::parse_optional(raw_input)?;
        debug!(
            "Generating feedback for user {} ({} chars)",
            user_id,
            input.char_len()
        );

        let feedback = self.generator.generate(&input).await;

        let record = self
            .store
            .insert(NewFeedback::new(user_id.clone(), input, feedback))
            .await
            .map_err(|e| {
                error!("Failed to persist feedback for user {}: {}", user_id, e);
                e
            })?;

        info!(
            "Created feedback {} for user {} ({} chars)",
            record.id,
            record.user_id,
            record.user_input.chars().count()
        );
        Ok(record)
    }

    /// The caller's newest records, newest first
    pub async fn history(&self, user_id: &UserId) -> Result<Vec<FeedbackEntry>> {
        self.store
            .find_recent(user_id, HISTORY_LIMIT)
            .await
            .map_err(|e| {
                error!("Failed to fetch feedback history for user {}: {}", user_id, e);
                e
            })
    }
}
