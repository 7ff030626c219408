//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use critique_core::{
    services::{FixedSelector, TemplateSelector},
    CompletionProvider, ConnectionMode, CritiqueError, FallbackFeedback, FeedbackEntry,
    FeedbackGenerator, FeedbackRecord, FeedbackService, FeedbackStore, LibsqlStorage, NewFeedback,
    Result, UserId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Create a file-backed LibSQL storage in a fresh temp location
pub async fn create_test_storage() -> LibsqlStorage {
    let temp_file = std::env::temp_dir().join(format!("critique_test_{}.db", uuid::Uuid::new_v4()));
    LibsqlStorage::new(ConnectionMode::Local(temp_file.to_string_lossy().to_string()))
        .await
        .expect("Failed to create test storage")
}

/// Store wrapper counting calls to each operation
pub struct CountingStore<S> {
    inner: S,
    pub inserts: AtomicUsize,
    pub queries: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            inserts: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: FeedbackStore> FeedbackStore for CountingStore<S> {
    async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(feedback).await
    }

    async fn find_recent(&self, user_id: &UserId, limit: usize) -> Result<Vec<FeedbackEntry>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_recent(user_id, limit).await
    }
}

/// Store whose every operation fails
pub struct FailingStore;

#[async_trait]
impl FeedbackStore for FailingStore {
    async fn insert(&self, _feedback: NewFeedback) -> Result<FeedbackRecord> {
        Err(CritiqueError::Database("database is locked".to_string()))
    }

    async fn find_recent(&self, _user_id: &UserId, _limit: usize) -> Result<Vec<FeedbackEntry>> {
        Err(CritiqueError::Database("no such table: feedback".to_string()))
    }
}

/// Completion provider returning a fixed reply (or failing) and counting calls
pub struct CountingProvider {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl CountingProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for CountingProvider {
    async fn complete(&self, _system: &str, user: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(reply) => Ok(format!("{} ({} chars reviewed)", reply, user.chars().count())),
            None => Err(CritiqueError::LlmApi("connection reset by peer".to_string())),
        }
    }
}

/// Fallback pinned to a single template
pub fn pinned_fallback(index: usize) -> FallbackFeedback {
    let selector: Arc<dyn TemplateSelector> = Arc::new(FixedSelector(index));
    FallbackFeedback::new(selector)
}

/// Everything a pipeline test needs to observe calls
pub struct Harness {
    pub service: Arc<FeedbackService>,
    pub store: Arc<CountingStore<LibsqlStorage>>,
    pub provider: Arc<CountingProvider>,
}

pub async fn harness_with(provider: CountingProvider) -> Harness {
    let store = Arc::new(CountingStore::new(create_test_storage().await));
    let provider = Arc::new(provider);

    let live: Arc<dyn CompletionProvider> = provider.clone();
    let generator = FeedbackGenerator::new(Some(live), pinned_fallback(0));
    let service = Arc::new(FeedbackService::new(Arc::new(generator), store.clone()));

    Harness {
        service,
        store,
        provider,
    }
}

pub async fn harness() -> Harness {
    harness_with(CountingProvider::replying("Well argued.")).await
}

pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}
