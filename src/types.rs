//! Core data types for the Critique feedback service
//!
//! These types carry the invariants of a feedback record: user input is
//! trimmed and bounded before it can reach the generator or the store,
//! generated feedback is never empty, and every record has exactly one owner.

use crate::error::{CritiqueError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted user input length, in characters, after trimming
pub const MAX_INPUT_CHARS: usize = 2000;

/// Message returned when the input is missing or blank
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text";

/// Message returned when the input exceeds [`MAX_INPUT_CHARS`]
pub const INPUT_TOO_LONG_MESSAGE: &str = "Text is too long";

/// Unique identifier for feedback records
///
/// Wraps a UUID so record IDs cannot be mixed up with other identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub Uuid);

impl FeedbackId {
    /// Create a new random feedback ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a feedback ID from a string
    pub fn from_string(s: &str) -> std::result::Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for FeedbackId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to the owning user
///
/// Identity is resolved outside this crate; all we require is a non-blank value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CritiqueError::Unauthorized(
                "Missing user identity".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// User-submitted text: trimmed, 1 to [`MAX_INPUT_CHARS`] characters
///
/// The only way to obtain one is through [`UserInput::parse`], so an
/// out-of-bounds input can never be handed to the generator or the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput(String);

impl UserInput {
    /// Trim and validate raw input
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CritiqueError::Validation(EMPTY_INPUT_MESSAGE.to_string()));
        }
        if trimmed.chars().count() > MAX_INPUT_CHARS {
            return Err(CritiqueError::Validation(
                INPUT_TOO_LONG_MESSAGE.to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Validate input that may be absent from the request altogether
    pub fn parse_optional(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some(raw) => Self::parse(raw),
            None => Err(CritiqueError::Validation(EMPTY_INPUT_MESSAGE.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Generated critique text, never empty after trimming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackText(String);

impl FeedbackText {
    /// Returns `None` when the text is blank
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Wrap one of the built-in templates
    pub(crate) fn from_template(text: &'static str) -> Self {
        Self(text.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A feedback record about to be persisted
///
/// `id` and `created_at` are assigned by the store when left unset.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub id: Option<FeedbackId>,
    pub user_id: UserId,
    pub user_input: UserInput,
    pub feedback: FeedbackText,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewFeedback {
    pub fn new(user_id: UserId, user_input: UserInput, feedback: FeedbackText) -> Self {
        Self {
            id: None,
            user_id,
            user_input,
            feedback,
            created_at: None,
        }
    }

    /// Pin the creation time instead of letting the store assign it
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// A persisted feedback record, including its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub user_input: String,
    pub feedback: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Public projection without ownership metadata
    pub fn entry(&self) -> FeedbackEntry {
        FeedbackEntry {
            id: self.id,
            user_input: self.user_input.clone(),
            feedback: self.feedback.clone(),
            created_at: self.created_at,
        }
    }
}

/// The client-visible shape of a record: what history and creation responses return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: FeedbackId,
    pub user_input: String,
    pub feedback: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackRecord> for FeedbackEntry {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            id: record.id,
            user_input: record.user_input,
            feedback: record.feedback,
            created_at: record.created_at,
        }
    }
}

/// Drop sub-millisecond precision so stored and returned timestamps agree
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_is_trimmed() {
        let input = UserInput::parse("   I think renewable energy is important.\n").unwrap();
        assert_eq!(input.as_str(), "I think renewable energy is important.");
    }

    #[test]
    fn test_empty_input_rejected() {
        for raw in ["", "   ", "\n\t "] {
            let err = UserInput::parse(raw).unwrap_err();
            assert!(matches!(err, CritiqueError::Validation(ref m) if m == EMPTY_INPUT_MESSAGE));
        }
        assert!(UserInput::parse_optional(None).is_err());
    }

    #[test]
    fn test_length_bounds() {
        assert!(UserInput::parse("a").is_ok());
        assert!(UserInput::parse(&"a".repeat(MAX_INPUT_CHARS)).is_ok());

        let err = UserInput::parse(&"a".repeat(MAX_INPUT_CHARS + 1)).unwrap_err();
        assert!(matches!(err, CritiqueError::Validation(ref m) if m == INPUT_TOO_LONG_MESSAGE));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 2000 three-byte characters is still within bounds
        let input = UserInput::parse(&"é".repeat(MAX_INPUT_CHARS)).unwrap();
        assert_eq!(input.char_len(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_surrounding_whitespace_not_counted() {
        let raw = format!("  {}  ", "b".repeat(MAX_INPUT_CHARS));
        assert!(UserInput::parse(&raw).is_ok());
    }

    #[test]
    fn test_feedback_text_rejects_blank() {
        assert!(FeedbackText::new("  ").is_none());
        assert_eq!(FeedbackText::new(" ok ").unwrap().as_str(), "ok");
    }

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(UserId::new("").is_err());
        assert_eq!(UserId::new(" u-1 ").unwrap().as_str(), "u-1");
    }

    #[test]
    fn test_feedback_id_roundtrip() {
        let id = FeedbackId::new();
        let parsed = FeedbackId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_entry_serializes_wire_names() {
        let record = FeedbackRecord {
            id: FeedbackId::new(),
            user_id: UserId::new("u-1").unwrap(),
            user_input: "hello".to_string(),
            feedback: "nice".to_string(),
            created_at: truncate_to_millis(Utc::now()),
        };

        let value = serde_json::to_value(record.entry()).unwrap();
        assert_eq!(value["user_input"], "hello");
        assert_eq!(value["feedback"], "nice");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("userId").is_none());

        let stored = serde_json::to_value(&record).unwrap();
        assert_eq!(stored["userId"], "u-1");
    }

    #[test]
    fn test_truncate_to_millis() {
        let ts = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let truncated = truncate_to_millis(ts);
        assert_eq!(truncated.timestamp_subsec_nanos(), 123_000_000);
    }
}
