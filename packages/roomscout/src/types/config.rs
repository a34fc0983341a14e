//! Configuration for the pipeline.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Configuration for the message-processing pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Retry policy for persistence create calls.
    ///
    /// Default: 3 attempts, 500ms base delay, doubling.
    pub retry: RetryPolicy,

    /// Maximum listings enumerated in a fallback chat reply. Default: 3.
    pub max_reply_listings: usize,

    /// Reference city used when deriving listing records. Default: "Boston".
    pub city: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            max_reply_listings: 3,
            city: "Boston".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the persistence retry policy.
    pub fn with_retry(mut self, max_attempts: u32, base_delay: Duration) -> Self {
        self.retry = RetryPolicy {
            max_attempts,
            base_delay,
        };
        self
    }

    /// Set the maximum number of listings enumerated in fallback replies.
    pub fn with_max_reply_listings(mut self, max: usize) -> Self {
        self.max_reply_listings = max;
        self
    }

    /// Set the reference city for derived records.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }
}
