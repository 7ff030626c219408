//! Template feedback used when live generation is unavailable
//!
//! Selection is delegated to a [`TemplateSelector`] so callers can pin the
//! chosen template; production uses [`RandomSelector`].

use crate::types::FeedbackText;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Generic critique paragraphs. They do not depend on the submitted text.
pub const FALLBACK_TEMPLATES: [&str; 3] = [
    "Your response shows a good grasp of the topic, and the ideas you present are clear and \
     well organized. To strengthen it further, add specific examples that support your main \
     points, and consider how someone with a different perspective might respond. Overall this \
     is a solid foundation that reflects careful thought about the subject.",
    "This is a thoughtful piece that demonstrates analytical thinking. Your central arguments \
     are persuasive and presented in a logical order. To improve, explain your key points in \
     more detail and address likely counterarguments directly. A firmer, more definitive \
     conclusion would also help. Keep developing your ideas with this level of care.",
    "Your writing shows creativity and original thinking, and your approach engages seriously \
     with the material. To make it even stronger, use clearer transitions so each idea leads \
     naturally into the next, and bring in more supporting evidence to make your claims more \
     convincing. There is real potential here for further development.",
];

/// Chooses which template to return
pub trait TemplateSelector: Send + Sync {
    /// Return an index in `0..count`. `count` is never zero.
    fn select(&self, count: usize) -> usize;
}

/// Uniformly random selection
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl TemplateSelector for RandomSelector {
    fn select(&self, count: usize) -> usize {
        rand::thread_rng().gen_range(0..count)
    }
}

/// Round-robin selection across calls
#[derive(Debug, Default)]
pub struct RotatingSelector {
    next: AtomicUsize,
}

impl RotatingSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateSelector for RotatingSelector {
    fn select(&self, count: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % count
    }
}

/// Always the same index (modulo the template count)
#[derive(Debug, Clone, Copy)]
pub struct FixedSelector(pub usize);

impl TemplateSelector for FixedSelector {
    fn select(&self, count: usize) -> usize {
        self.0 % count
    }
}

/// The fallback generator. Never fails.
#[derive(Clone)]
pub struct FallbackFeedback {
    selector: Arc<dyn TemplateSelector>,
}

impl FallbackFeedback {
    pub fn new(selector: Arc<dyn TemplateSelector>) -> Self {
        Self { selector }
    }

    /// Fallback with random template selection
    pub fn random() -> Self {
        Self::new(Arc::new(RandomSelector))
    }

    pub fn templates(&self) -> &'static [&'static str] {
        &FALLBACK_TEMPLATES
    }

    pub fn pick(&self) -> FeedbackText {
        let index = self.selector.select(FALLBACK_TEMPLATES.len()) % FALLBACK_TEMPLATES.len();
        debug!("Using fallback feedback template #{}", index);
        FeedbackText::from_template(FALLBACK_TEMPLATES[index])
    }
}

impl Default for FallbackFeedback {
    fn default() -> Self {
        Self::random()
    }
}

impl std::fmt::Debug for FallbackFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackFeedback")
            .field("templates", &FALLBACK_TEMPLATES.len())
            .finish()
    }
}

/// Whether `text` is one of the fallback templates
pub fn is_fallback_template(text: &str) -> bool {
    FALLBACK_TEMPLATES.iter().any(|t| *t == text)
}
