//! The seam between the runner and the remote extraction service.

use async_trait::async_trait;
use search_graph_adapter::{GraphOptions, NodeExecInfo, SearchGraphClient, SearchGraphError};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::request::ExtractionRequest;

/// Failure of a single extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Transient throttling; the runner retries with backoff.
    #[error("rate limited (retry after: {retry_after:?})")]
    RateLimited {
        /// Server-suggested wait, if any.
        retry_after: Option<Duration>,
    },

    /// The service rejected or failed the request.
    #[error("service error{}: {message}", status_suffix(.status))]
    Service {
        /// HTTP status, if any.
        status: Option<u16>,
        /// Failure description.
        message: String,
    },

    /// Network, decoding, or other unexpected failure.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl From<SearchGraphError> for ServiceError {
    fn from(err: SearchGraphError) -> Self {
        match err {
            SearchGraphError::RateLimited { retry_after, .. } => Self::RateLimited { retry_after },
            SearchGraphError::Api { status, body } => Self::Service {
                status: Some(status),
                message: body,
            },
            SearchGraphError::MissingCredential(_) | SearchGraphError::InvalidConfig(_) => {
                Self::Service {
                    status: None,
                    message: err.to_string(),
                }
            }
            SearchGraphError::Transport(_) | SearchGraphError::Decode(_) => {
                Self::Unexpected(err.to_string())
            }
        }
    }
}

/// Raw output of a successful extraction call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResponse {
    /// Record as returned by the service, before projection.
    pub record: Value,
    /// Per-node execution info reported by the service.
    pub exec_info: Vec<NodeExecInfo>,
}

/// A remote service that fills a schema from a prompt.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Issues one extraction with `max_completion_tokens` as the generation cap.
    async fn extract(
        &self,
        request: &ExtractionRequest,
        max_completion_tokens: u64,
    ) -> Result<ExtractionResponse, ServiceError>;
}

#[async_trait]
impl ExtractionService for SearchGraphClient {
    async fn extract(
        &self,
        request: &ExtractionRequest,
        max_completion_tokens: u64,
    ) -> Result<ExtractionResponse, ServiceError> {
        let options = GraphOptions {
            model: request.model.model_name.clone(),
            max_tokens: max_completion_tokens,
            max_results: request.model.max_results,
            headless: request.model.headless,
            verbose: request.verbose,
        };
        let response = self
            .run(request.graph, &request.prompt, &request.target_schema, &options)
            .await?;
        Ok(ExtractionResponse {
            record: response.result,
            exec_info: response.exec_info,
        })
    }
}
