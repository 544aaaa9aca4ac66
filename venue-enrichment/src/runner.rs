//! Bounded retry loop around a single logical extraction request.

use search_graph_adapter::{total_row, NodeExecInfo};
use tokio::time::Instant;

use crate::config::RunLimits;
use crate::error::{AttemptOutcome, AttemptRecord, RunError};
use crate::metrics::{estimate_tokens, RunMetrics, RunState};
use crate::request::ExtractionRequest;
use crate::schema::{project, record_payload, ProjectedVenue};
use crate::service::{ExtractionService, ServiceError};
use crate::sink::RecordSink;
use crate::validation::collect_schema_warnings;

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The persisted record and any extras.
    pub venue: ProjectedVenue,
    /// Where the record was written.
    pub location: String,
    /// Final run state.
    pub state: RunState,
    /// Metrics tracked across attempts.
    pub metrics: RunMetrics,
    /// History of all attempts, the successful one last.
    pub history: Vec<AttemptRecord>,
    /// Execution info of the successful attempt.
    pub exec_info: Vec<NodeExecInfo>,
    /// Schema mismatches found in the raw record.
    pub schema_warnings: Vec<String>,
}

/// Runs an extraction under a token budget, a retry cap and a wall-clock deadline.
///
/// Only rate limits are retried, with exponential backoff; every other
/// failure ends the run. At most one record is written per run.
pub struct BoundedRetryRunner<S, K> {
    service: S,
    sink: K,
    limits: RunLimits,
}

impl<S, K> BoundedRetryRunner<S, K>
where
    S: ExtractionService,
    K: RecordSink,
{
    /// Creates a runner over `service`, writing successes to `sink`.
    #[must_use]
    pub const fn new(service: S, sink: K, limits: RunLimits) -> Self {
        Self {
            service,
            sink,
            limits,
        }
    }

    /// Limits this runner enforces.
    #[must_use]
    pub const fn limits(&self) -> &RunLimits {
        &self.limits
    }

    /// The service attempts are sent to.
    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// The sink successes are written to.
    #[must_use]
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Runs the loop for `request` until success or a terminal failure.
    ///
    /// Each rate limit is followed by a backoff wait, except the one that
    /// uses up the last retry: the run then ends at once with
    /// `RetriesExhausted`, so `max_retries` rate limits produce
    /// `max_retries - 1` waits.
    ///
    /// # Errors
    ///
    /// Returns `RunError::Configuration` if the limits are invalid,
    /// `RunError::TimedOut` when the deadline passes between attempts,
    /// `RunError::BudgetExhausted` when the next budget would be below the
    /// minimum, `RunError::Service`/`RunError::Unexpected` on non-retryable
    /// service failures, `RunError::RetriesExhausted` when every retry was
    /// rate limited, and `RunError::Persist` if the record cannot be written.
    pub async fn run(&self, request: &ExtractionRequest) -> Result<RunReport, RunError> {
        self.limits.validate()?;
        if self.limits.per_attempt_token_limit > request.model.max_completion_tokens {
            tracing::warn!(
                per_attempt = self.limits.per_attempt_token_limit,
                model_max = request.model.max_completion_tokens,
                "per-attempt budget exceeds the model's completion ceiling"
            );
        }

        let start = Instant::now();
        let mut state = RunState::default();
        let mut history: Vec<AttemptRecord> = Vec::new();
        let mut metrics = RunMetrics::default();
        let prompt_tokens = estimate_tokens(&request.prompt);

        while state.retry_count < self.limits.max_retries {
            state.elapsed = start.elapsed();
            if state.elapsed > self.limits.max_wall_clock {
                tracing::warn!(
                    elapsed_ms = state.elapsed.as_millis() as u64,
                    limit_ms = self.limits.max_wall_clock.as_millis() as u64,
                    "wall-clock budget exhausted before next attempt"
                );
                metrics.wall_time = state.elapsed;
                return Err(RunError::TimedOut {
                    elapsed: state.elapsed,
                    limit: self.limits.max_wall_clock,
                    state,
                    metrics,
                });
            }

            let remaining = self
                .limits
                .total_token_limit
                .saturating_sub(state.tokens_used);
            let budget = self.limits.per_attempt_token_limit.min(remaining);
            if budget < self.limits.min_attempt_tokens {
                tracing::warn!(remaining, minimum = self.limits.min_attempt_tokens, "token budget exhausted");
                return Err(RunError::BudgetExhausted {
                    remaining,
                    minimum: self.limits.min_attempt_tokens,
                    state,
                });
            }

            metrics.total_attempts += 1;
            metrics.tokens_requested += budget;
            metrics.estimated_prompt_tokens += prompt_tokens;
            let attempt = metrics.total_attempts;

            tracing::info!(
                attempt,
                budget,
                remaining,
                retry_count = state.retry_count,
                graph = ?request.graph,
                "issuing extraction request"
            );

            match self.service.extract(request, budget).await {
                Ok(response) => {
                    state.tokens_used += budget;
                    state.elapsed = start.elapsed();

                    let payload = record_payload(&response.record).unwrap_or(&response.record);
                    let schema_warnings = collect_schema_warnings(&request.target_schema, payload);
                    for warning in &schema_warnings {
                        tracing::warn!(attempt, %warning, "response deviates from target schema");
                    }

                    let venue = project(&response.record, request.variant);
                    let location = self.sink.location();
                    self.sink
                        .persist(&venue.record)
                        .await
                        .map_err(|source| RunError::Persist {
                            location: location.clone(),
                            source,
                            state,
                        })?;

                    history.push(AttemptRecord {
                        attempt_number: attempt,
                        token_budget: budget,
                        outcome: AttemptOutcome::Succeeded,
                        elapsed: state.elapsed,
                    });
                    metrics.wall_time = start.elapsed();
                    metrics.reported_tokens = (!response.exec_info.is_empty())
                        .then(|| total_row(&response.exec_info).total_tokens);

                    tracing::info!(
                        attempt,
                        tokens_used = state.tokens_used,
                        reported_tokens = ?metrics.reported_tokens,
                        %location,
                        "venue record persisted"
                    );

                    return Ok(RunReport {
                        venue,
                        location,
                        state,
                        metrics,
                        history,
                        exec_info: response.exec_info,
                        schema_warnings,
                    });
                }
                Err(ServiceError::RateLimited { retry_after }) => {
                    state.retry_count += 1;
                    state.tokens_used = 0;
                    state.elapsed = start.elapsed();
                    history.push(AttemptRecord {
                        attempt_number: attempt,
                        token_budget: budget,
                        outcome: AttemptOutcome::RateLimited { retry_after },
                        elapsed: state.elapsed,
                    });

                    if state.retry_count >= self.limits.max_retries {
                        tracing::warn!(attempt, retry_count = state.retry_count, "rate limited; no retries left");
                        break;
                    }

                    let wait = self.limits.backoff_delay(state.retry_count);
                    tracing::warn!(
                        attempt,
                        retry_count = state.retry_count,
                        wait_ms = wait.as_millis() as u64,
                        retry_after_secs = retry_after.map(|d| d.as_secs()),
                        "rate limited; backing off"
                    );
                    metrics.backoff_waits.push(wait);
                    tokio::time::sleep(wait).await;
                }
                Err(ServiceError::Service { status, message }) => {
                    state.elapsed = start.elapsed();
                    tracing::error!(attempt, ?status, %message, "service error; not retrying");
                    return Err(RunError::Service {
                        status,
                        message,
                        attempt,
                        state,
                    });
                }
                Err(ServiceError::Unexpected(message)) => {
                    state.elapsed = start.elapsed();
                    tracing::error!(attempt, %message, "unexpected failure; not retrying");
                    return Err(RunError::Unexpected {
                        message,
                        attempt,
                        state,
                    });
                }
            }
        }

        state.elapsed = start.elapsed();
        metrics.wall_time = state.elapsed;
        Err(RunError::RetriesExhausted {
            retries: state.retry_count,
            max_retries: self.limits.max_retries,
            state,
            history,
            metrics,
        })
    }
}
