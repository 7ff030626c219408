//! HTTP client for the feedback API
//!
//! [`FeedbackClient`] keeps a [`LocalHistory`] in step with the server: a
//! successful submission is prepended and the list is cut back to
//! [`HISTORY_LIMIT`]; a failed one leaves it untouched. `submit` borrows the
//! client mutably, so a second submission cannot start while one is in flight.

use crate::api::ApiResponse;
use crate::error::{CritiqueError, Result};
use crate::feedback::HISTORY_LIMIT;
use crate::types::{FeedbackEntry, UserId, UserInput};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client-side copy of the caller's newest records, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalHistory {
    entries: Vec<FeedbackEntry>,
}

impl LocalHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a server snapshot, keeping at most the limit
    pub fn replace(&mut self, mut entries: Vec<FeedbackEntry>) {
        entries.truncate(HISTORY_LIMIT);
        self.entries = entries;
    }

    /// Add a new record at the head and drop anything past the limit
    pub fn prepend(&mut self, entry: FeedbackEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct FeedbackClient {
    http: reqwest::Client,
    base_url: String,
    user_id: UserId,
    user_header: String,
    history: LocalHistory,
}

impl FeedbackClient {
    pub fn new(base_url: &str, user_id: UserId) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id,
            user_header: "x-user-id".to_string(),
            history: LocalHistory::new(),
        })
    }

    /// Use a different identity header than `x-user-id`
    pub fn with_user_header(mut self, header: impl Into<String>) -> Self {
        self.user_header = header.into();
        self
    }

    pub fn history(&self) -> &LocalHistory {
        &self.history
    }

    /// Submit text for feedback
    ///
    /// Input is validated locally first; an invalid submission never leaves
    /// the process.
    pub async fn submit(&mut self, text: &str) -> Result<FeedbackEntry> {
        let input = UserInput::parse(text)?;

        let response = self
            .http
            .post(format!("{}/feedback", self.base_url))
            .header(self.user_header.as_str(), self.user_id.as_str())
            .json(&serde_json::json!({ "user_input": input.as_str() }))
            .send()
            .await?;

        let entry: FeedbackEntry = Self::read_data(response).await?;
        debug!("Received feedback {}", entry.id);

        self.history.prepend(entry.clone());
        Ok(entry)
    }

    /// Reload history from the server
    pub async fn refresh_history(&mut self) -> Result<&LocalHistory> {
        let response = self
            .http
            .get(format!("{}/feedback/history", self.base_url))
            .header(self.user_header.as_str(), self.user_id.as_str())
            .send()
            .await?;

        let entries: Vec<FeedbackEntry> = Self::read_data(response).await?;
        self.history.replace(entries);
        Ok(&self.history)
    }

    async fn read_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| CritiqueError::Other(format!("Unexpected response ({}): {}", status, e)))?;

        if status.is_success() && body.success {
            return body
                .data
                .ok_or_else(|| CritiqueError::Other("Response has no data".to_string()));
        }

        let message = body
            .message
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        Err(match status {
            StatusCode::BAD_REQUEST => CritiqueError::Validation(message),
            StatusCode::UNAUTHORIZED => CritiqueError::Unauthorized(message),
            _ => CritiqueError::Other(message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeedbackId;
    use chrono::Utc;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn entry(input: &str) -> FeedbackEntry {
        FeedbackEntry {
            id: FeedbackId::new(),
            user_input: input.to_string(),
            feedback: format!("on {}", input),
            created_at: crate::types::truncate_to_millis(Utc::now()),
        }
    }

    #[test]
    fn test_prepend_keeps_newest_five() {
        let mut history = LocalHistory::new();
        for i in 0..7 {
            history.prepend(entry(&format!("e{}", i)));
        }

        assert_eq!(history.len(), HISTORY_LIMIT);
        let inputs: Vec<&str> = history.entries().iter().map(|e| e.user_input.as_str()).collect();
        assert_eq!(inputs, vec!["e6", "e5", "e4", "e3", "e2"]);
    }

    #[test]
    fn test_replace_truncates() {
        let mut history = LocalHistory::new();
        history.replace((0..8).map(|i| entry(&i.to_string())).collect());
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.entries()[0].user_input, "0");
    }

    #[tokio::test]
    async fn test_submit_prepends_on_success() {
        let mut server = Server::new_async().await;
        let created = entry("hello");

        let mock = server
            .mock("POST", "/feedback")
            .match_header("x-user-id", "u1")
            .match_body(Matcher::Json(json!({ "user_input": "hello" })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "success": true,
                    "message": "Feedback generated successfully",
                    "data": created,
                })
                .to_string(),
            )
            .create_async()
            .await;

        let mut client = FeedbackClient::new(&server.url(), UserId::new("u1").unwrap()).unwrap();
        let returned = client.submit("  hello ").await.unwrap();

        assert_eq!(returned, created);
        assert_eq!(client.history().entries(), &[created]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_submit_leaves_history_unchanged() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/feedback")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "success": false, "message": "Error generating feedback" }"#)
            .create_async()
            .await;

        let mut client = FeedbackClient::new(&server.url(), UserId::new("u1").unwrap()).unwrap();
        let err = client.submit("hello").await.unwrap_err();

        assert!(matches!(err, CritiqueError::Other(ref m) if m == "Error generating feedback"));
        assert!(client.history().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_never_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/feedback")
            .expect(0)
            .create_async()
            .await;

        let mut client = FeedbackClient::new(&server.url(), UserId::new("u1").unwrap()).unwrap();
        assert!(matches!(
            client.submit("   ").await,
            Err(CritiqueError::Validation(_))
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_refresh_history() {
        let mut server = Server::new_async().await;
        let entries = vec![entry("b"), entry("a")];

        let _mock = server
            .mock("GET", "/feedback/history")
            .match_header("x-user-id", "u1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "success": true, "data": entries }).to_string())
            .create_async()
            .await;

        let mut client = FeedbackClient::new(&server.url(), UserId::new("u1").unwrap()).unwrap();
        let history = client.refresh_history().await.unwrap();
        assert_eq!(history.entries(), entries.as_slice());
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/feedback/history")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "success": false, "message": "Not authorized" }"#)
            .create_async()
            .await;

        let mut client = FeedbackClient::new(&server.url(), UserId::new("u1").unwrap()).unwrap();
        assert!(matches!(
            client.refresh_history().await,
            Err(CritiqueError::Unauthorized(_))
        ));
    }
}
