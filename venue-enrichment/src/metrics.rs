//! Run state, metrics tracking and token estimation for enrichment runs.

use std::time::Duration;

/// Mutable counters owned by one runner invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunState {
    /// Time since the run started, refreshed at each loop step.
    pub elapsed: Duration,
    /// Tokens counted against the total limit in the current backoff cycle.
    pub tokens_used: u64,
    /// Rate-limit retries consumed so far.
    pub retry_count: u32,
}

/// Metrics collected during an enrichment run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunMetrics {
    /// Total number of attempts issued.
    pub total_attempts: u32,
    /// Wall-clock time elapsed during the run.
    pub wall_time: Duration,
    /// Backoff waits taken, in order.
    pub backoff_waits: Vec<Duration>,
    /// Sum of the budgets sent across all attempts.
    pub tokens_requested: u64,
    /// Estimated prompt tokens summed across all attempts.
    pub estimated_prompt_tokens: usize,
    /// Token total reported by the service for the successful attempt.
    pub reported_tokens: Option<u64>,
}

/// Estimate token count from text using the standard 4-chars-per-token heuristic.
///
/// Uses `chars().count()` so multi-byte text is not overcounted, and rounds up.
///
/// # Examples
///
/// ```
/// use venue_enrichment::estimate_tokens;
///
/// assert_eq!(estimate_tokens("hello"), 2);
/// assert_eq!(estimate_tokens("hello world"), 3);
/// ```
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
