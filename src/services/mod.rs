//! Services layer for Critique
//!
//! Provides completion provider integration and the feedback generator that
//! wraps it with template fallback.

pub mod fallback;
pub mod generator;
pub mod llm;

pub use fallback::{
    is_fallback_template, FallbackFeedback, FixedSelector, RandomSelector, RotatingSelector,
    TemplateSelector, FALLBACK_TEMPLATES,
};
pub use generator::{FeedbackGenerator, SYSTEM_PROMPT};
pub use llm::{ChatCompletionClient, CompletionProvider};
