//! Error types for enrichment runs with attempt history tracking.

use std::time::Duration;
use thiserror::Error;

use crate::metrics::{RunMetrics, RunState};

/// How a single attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The service returned a record.
    Succeeded,
    /// The service throttled the request.
    RateLimited {
        /// Server-suggested wait, if any.
        retry_after: Option<Duration>,
    },
    /// The service failed with a non-retryable error.
    Failed(String),
}

/// Record of a single extraction attempt.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// The attempt number (1-indexed).
    pub attempt_number: u32,
    /// Completion-token budget sent with this attempt.
    pub token_budget: u64,
    /// How the attempt ended.
    pub outcome: AttemptOutcome,
    /// Elapsed run time when the attempt ended.
    pub elapsed: Duration,
}

/// Errors that end an enrichment run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Limits or settings are unusable; nothing was sent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The service failed with a non-rate-limit error.
    #[error("Service error at attempt {attempt}: {message}")]
    Service {
        /// HTTP status, when the failure carried one.
        status: Option<u16>,
        /// Failure description.
        message: String,
        /// Attempt that failed.
        attempt: u32,
        /// Run state when the run ended.
        state: RunState,
    },

    /// Transport, decoding, or other unexpected failure.
    #[error("Unexpected error at attempt {attempt}: {message}")]
    Unexpected {
        /// Failure description.
        message: String,
        /// Attempt that failed.
        attempt: u32,
        /// Run state when the run ended.
        state: RunState,
    },

    /// Wall-clock budget ran out between attempts.
    #[error("Timed out after {elapsed:?} (limit: {limit:?})")]
    TimedOut {
        /// Elapsed time at the check.
        elapsed: Duration,
        /// Configured wall-clock limit.
        limit: Duration,
        /// Run state when the run ended.
        state: RunState,
        /// Metrics tracked across attempts.
        metrics: RunMetrics,
    },

    /// Every allowed retry was consumed by rate limits.
    #[error("Rate limited on every attempt; gave up after {retries} retries (max: {max_retries})")]
    RetriesExhausted {
        /// Retries consumed.
        retries: u32,
        /// Retries allowed.
        max_retries: u32,
        /// Run state when the run ended.
        state: RunState,
        /// History of all attempts.
        history: Vec<AttemptRecord>,
        /// Metrics tracked across attempts.
        metrics: RunMetrics,
    },

    /// The remaining token budget is too small to send another request.
    #[error("Token budget exhausted: {remaining} tokens remaining, at least {minimum} required")]
    BudgetExhausted {
        /// Tokens left under the total limit.
        remaining: u64,
        /// Configured minimum per attempt.
        minimum: u64,
        /// Run state when the run ended.
        state: RunState,
    },

    /// The record was extracted but could not be written.
    #[error("Failed to persist record to {location}: {source}")]
    Persist {
        /// Sink location.
        location: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
        /// State after the successful attempt.
        state: RunState,
    },
}

impl RunError {
    /// Short label used in the final status line.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIG",
            Self::Service { .. } => "SERVICE ERROR",
            Self::Unexpected { .. } => "UNEXPECTED",
            Self::TimedOut { .. } => "TIMEOUT",
            Self::RetriesExhausted { .. } => "RETRIES EXHAUSTED",
            Self::BudgetExhausted { .. } => "BUDGET EXHAUSTED",
            Self::Persist { .. } => "PERSIST FAILED",
        }
    }

    /// Run state at termination, for failures that happened inside the loop.
    #[must_use]
    pub const fn state(&self) -> Option<&RunState> {
        match self {
            Self::Service { state, .. }
            | Self::Unexpected { state, .. }
            | Self::TimedOut { state, .. }
            | Self::RetriesExhausted { state, .. }
            | Self::BudgetExhausted { state, .. }
            | Self::Persist { state, .. } => Some(state),
            Self::Configuration(_) => None,
        }
    }
}
