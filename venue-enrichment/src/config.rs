//! Limits and model settings for a single enrichment run.

use std::time::Duration;

use crate::error::RunError;

/// Limits enforced by the bounded retry runner.
#[derive(Debug, Clone, PartialEq)]
pub struct RunLimits {
    /// Tokens a whole run may request across attempts that count (default: 10900).
    pub total_token_limit: u64,
    /// Completion-token cap for one attempt (default: 1500).
    pub per_attempt_token_limit: u64,
    /// Rate-limit retries allowed before giving up (default: 5).
    pub max_retries: u32,
    /// Wall-clock budget checked before each attempt (default: 300s).
    pub max_wall_clock: Duration,
    /// Exponential backoff base (default: 2.0).
    pub backoff_base: f64,
    /// Backoff unit multiplied by `backoff_base^retry` (default: 1s).
    pub initial_wait: Duration,
    /// Upper bound for one backoff wait (default: 300s).
    pub max_backoff: Duration,
    /// Smallest budget worth sending; below it the run aborts (default: 1).
    pub min_attempt_tokens: u64,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            total_token_limit: 10_900,
            per_attempt_token_limit: 1_500,
            max_retries: 5,
            max_wall_clock: Duration::from_secs(300),
            backoff_base: 2.0,
            initial_wait: Duration::from_secs(1),
            max_backoff: Duration::from_secs(300),
            min_attempt_tokens: 1,
        }
    }
}

impl RunLimits {
    /// Set the cumulative token limit.
    #[must_use]
    pub const fn with_total_token_limit(mut self, tokens: u64) -> Self {
        self.total_token_limit = tokens;
        self
    }

    /// Set the per-attempt token limit.
    #[must_use]
    pub const fn with_per_attempt_token_limit(mut self, tokens: u64) -> Self {
        self.per_attempt_token_limit = tokens;
        self
    }

    /// Set the maximum number of rate-limit retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the wall-clock budget.
    #[must_use]
    pub const fn with_max_wall_clock(mut self, limit: Duration) -> Self {
        self.max_wall_clock = limit;
        self
    }

    /// Set the backoff base and initial wait.
    #[must_use]
    pub fn with_backoff(mut self, base: f64, initial_wait: Duration) -> Self {
        self.backoff_base = base;
        self.initial_wait = initial_wait;
        self
    }

    /// Set the cap for a single backoff wait.
    #[must_use]
    pub const fn with_max_backoff(mut self, cap: Duration) -> Self {
        self.max_backoff = cap;
        self
    }

    /// Set the minimum budget an attempt must have.
    #[must_use]
    pub const fn with_min_attempt_tokens(mut self, tokens: u64) -> Self {
        self.min_attempt_tokens = tokens;
        self
    }

    /// Checks that the limits describe a run that can make progress.
    ///
    /// # Errors
    ///
    /// Returns `RunError::Configuration` describing the first invalid limit.
    pub fn validate(&self) -> Result<(), RunError> {
        if self.total_token_limit == 0 {
            return Err(RunError::Configuration(
                "total token limit must be positive".to_string(),
            ));
        }
        if self.per_attempt_token_limit == 0 {
            return Err(RunError::Configuration(
                "per-attempt token limit must be positive".to_string(),
            ));
        }
        if self.max_retries == 0 {
            return Err(RunError::Configuration(
                "max retries must be at least 1".to_string(),
            ));
        }
        if self.min_attempt_tokens == 0 {
            return Err(RunError::Configuration(
                "minimum attempt tokens must be at least 1".to_string(),
            ));
        }
        if !self.backoff_base.is_finite() || self.backoff_base < 1.0 {
            return Err(RunError::Configuration(format!(
                "backoff base must be a finite number >= 1, got {}",
                self.backoff_base
            )));
        }
        Ok(())
    }

    /// Wait before the attempt that follows the `retry`-th rate limit.
    ///
    /// Computes `initial_wait * backoff_base^retry`, clamped to `max_backoff`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use venue_enrichment::RunLimits;
    ///
    /// let limits = RunLimits::default();
    /// assert_eq!(limits.backoff_delay(1), Duration::from_secs(2));
    /// assert_eq!(limits.backoff_delay(2), Duration::from_secs(4));
    /// ```
    #[must_use]
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_wait.as_secs_f64() * self.backoff_base.powi(exponent);
        Duration::try_from_secs_f64(secs)
            .map_or(self.max_backoff, |wait| wait.min(self.max_backoff))
    }
}

/// Model and search settings forwarded with every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Model identifier (default: `gpt-4-turbo`).
    pub model_name: String,
    /// Completion-token ceiling advertised for the model (default: 1500).
    ///
    /// The runner's per-attempt budget is what is actually sent.
    pub max_completion_tokens: u64,
    /// Search results the graph should consider (default: 10).
    pub max_results: u32,
    /// Headless page fetching (default: true).
    pub headless: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: "gpt-4-turbo".to_string(),
            max_completion_tokens: 1_500,
            max_results: 10,
            headless: true,
        }
    }
}

impl ModelConfig {
    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = model.into();
        self
    }

    /// Set the number of search results.
    #[must_use]
    pub const fn with_max_results(mut self, max: u32) -> Self {
        self.max_results = max;
        self
    }

    /// Set headless page fetching.
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}
