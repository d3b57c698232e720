//! Round prompts: the topic source boundary and its fallback.
//!
//! The room never knows where prompts come from. A [`TopicSource`] might
//! call a generative text service, read a word list, or return a canned
//! string in tests. [`generate_topic`] wraps any source with a deadline and
//! a fallback, so a slow or broken provider can never stall or fail a round.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Why a topic source couldn't deliver.
#[derive(Debug, thiserror::Error)]
pub enum TopicError {
    /// The provider failed or refused.
    #[error("topic source unavailable: {0}")]
    Unavailable(String),
}

/// Produces one short, visually concrete, funny drawing prompt.
///
/// # Example
///
/// ```rust
/// use scrawl_room::{TopicError, TopicSource};
///
/// struct Always(&'static str);
///
/// impl TopicSource for Always {
///     async fn generate(&self) -> Result<String, TopicError> {
///         Ok(self.0.to_string())
///     }
/// }
/// ```
pub trait TopicSource: Send + Sync + 'static {
    fn generate(
        &self,
    ) -> impl Future<Output = Result<String, TopicError>> + Send;
}

const BUILTIN_TOPICS: &[&str] = &[
    "Godzilla wearing a face mask",
    "A confused robot",
    "A penguin on a skateboard",
    "Grandma riding a dragon",
    "A cat doing taxes",
    "A snowman at the beach",
    "A dinosaur brushing its teeth",
    "An octopus playing drums",
];

/// Offline topic source that picks from a fixed list.
#[derive(Debug, Clone)]
pub struct StaticTopics {
    topics: Vec<String>,
}

impl StaticTopics {
    pub fn new(topics: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for StaticTopics {
    fn default() -> Self {
        Self::new(BUILTIN_TOPICS.iter().copied())
    }
}

impl TopicSource for StaticTopics {
    async fn generate(&self) -> Result<String, TopicError> {
        if self.topics.is_empty() {
            return Err(TopicError::Unavailable("topic list is empty".into()));
        }
        let idx = rand::rng().random_range(0..self.topics.len());
        Ok(self.topics[idx].clone())
    }
}

/// Asks `source` for a topic, giving up after `timeout`.
///
/// Never fails: an error, a timeout, or a blank answer all yield
/// `fallback`. The result is trimmed.
pub async fn generate_topic<S: TopicSource>(
    source: &S,
    timeout: Duration,
    fallback: &str,
) -> String {
    match tokio::time::timeout(timeout, source.generate()).await {
        Ok(Ok(topic)) if !topic.trim().is_empty() => topic.trim().to_string(),
        Ok(Ok(_)) => {
            tracing::warn!("topic source returned a blank topic, using fallback");
            fallback.to_string()
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "topic source failed, using fallback");
            fallback.to_string()
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = timeout.as_millis() as u64,
                "topic source timed out, using fallback"
            );
            fallback.to_string()
        }
    }
}
