//! Generation settings value object
//!
//! Batch size and retry ceilings are plain configuration so tests can
//! shrink them and operators can tune them per model.

use std::time::Duration;

/// Tunables for a generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    // Batching
    pub batch_size: usize,
    /// Batches allowed beyond the planned number to replace rejected items
    pub extra_batches: usize,
    /// Hard ceiling on batches; overrides `extra_batches` when set
    pub max_batches: Option<usize>,

    // Retry policy
    pub transport_retries: u32,
    pub retry_malformed: bool,
    pub retry_delay_ms: u64,

    // Model call
    pub request_timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            batch_size: 5,
            extra_batches: 2,
            max_batches: None,
            transport_retries: 2,
            retry_malformed: true,
            retry_delay_ms: 500,
            request_timeout_secs: 120,
            temperature: 0.8,
            max_tokens: None,
        }
    }
}

impl GenerationSettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            batch_size: env_or("ITEMSMITH_BATCH_SIZE", defaults.batch_size),
            extra_batches: env_or("ITEMSMITH_EXTRA_BATCHES", defaults.extra_batches),
            max_batches: std::env::var("ITEMSMITH_MAX_BATCHES").ok().and_then(|v| v.parse().ok()),
            transport_retries: env_or("ITEMSMITH_TRANSPORT_RETRIES", defaults.transport_retries),
            retry_malformed: env_or("ITEMSMITH_RETRY_MALFORMED", defaults.retry_malformed),
            retry_delay_ms: env_or("ITEMSMITH_RETRY_DELAY_MS", defaults.retry_delay_ms),
            request_timeout_secs: env_or("ITEMSMITH_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            temperature: env_or("ITEMSMITH_TEMPERATURE", defaults.temperature),
            max_tokens: std::env::var("ITEMSMITH_MAX_TOKENS").ok().and_then(|v| v.parse().ok()),
        }
    }

    /// Items requested per model call, never zero
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    /// Number of batches allowed for a request of `requested` items, at least one
    pub fn batch_ceiling(&self, requested: usize) -> usize {
        if let Some(max) = self.max_batches {
            // A run always gets at least one attempt
            return max.max(1);
        }
        let planned = requested.div_ceil(self.effective_batch_size());
        planned + self.extra_batches
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
