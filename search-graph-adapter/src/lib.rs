//! Rust adapter for a remote search-graph extraction service.
//!
//! The service runs web search, page retrieval and schema-constrained LLM
//! extraction behind a single HTTP call. This crate owns the credentials,
//! the request/response wire format, and the classification of failures into
//! rate limits, API errors and transport errors.

/// Resolution of the secrets forwarded to the service.
pub mod credentials;
/// Error types returned by adapter operations.
pub mod error;
/// Formatting of per-node execution info.
pub mod exec_info;
/// Request execution and response decoding.
pub mod http;
/// Wire types for requests, responses and execution info.
pub mod types;

pub use credentials::{Credentials, ENDPOINT_ENV_VAR, LLM_API_KEY_ENV, SEARCH_API_KEY_ENV};
pub use error::SearchGraphError;
pub use exec_info::{prettify_exec_info, total_row};
pub use types::*;

use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Endpoint used when neither a flag nor `SEARCH_GRAPH_URL` provides one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// High-level client for the search-graph service.
#[derive(Clone, Debug)]
pub struct SearchGraphClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl SearchGraphClient {
    /// Creates a client for the service rooted at `endpoint`.
    ///
    /// `request_timeout` bounds a single HTTP exchange.
    ///
    /// # Errors
    ///
    /// Returns `SearchGraphError::InvalidConfig` if `endpoint` is not an
    /// absolute http(s) URL, or `SearchGraphError::Transport` if the HTTP
    /// client cannot be built.
    pub fn new(
        endpoint: &str,
        credentials: Credentials,
        request_timeout: Duration,
    ) -> Result<Self, SearchGraphError> {
        let base_url = parse_base_url(endpoint)?;
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Root URL of the service.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Runs one graph invocation and returns the decoded response.
    ///
    /// # Errors
    ///
    /// Returns `SearchGraphError::RateLimited` when the service throttles the
    /// request, `SearchGraphError::Api` for other non-success statuses,
    /// `SearchGraphError::Transport` for network failures and
    /// `SearchGraphError::Decode` when the body cannot be decoded.
    pub async fn run(
        &self,
        kind: GraphKind,
        prompt: &str,
        schema: &Value,
        options: &GraphOptions,
    ) -> Result<GraphResponse, SearchGraphError> {
        let url = self
            .base_url
            .join(kind.endpoint_path())
            .map_err(|e| SearchGraphError::InvalidConfig(e.to_string()))?;

        let body = GraphRequest {
            prompt: prompt.to_string(),
            schema: schema.clone(),
            config: GraphConfig {
                llm: LlmConfig {
                    model: options.model.clone(),
                    api_key: self.credentials.llm_api_key.clone(),
                    max_tokens: options.max_tokens,
                },
                search: SearchConfig {
                    api_key: self.credentials.search_api_key.clone(),
                    max_results: options.max_results,
                },
                headless: options.headless,
                verbose: options.verbose,
            },
        };

        tracing::debug!(%url, model = %options.model, max_tokens = options.max_tokens, "posting graph request");
        http::post_graph(&self.http, &url, &body).await
    }
}

fn parse_base_url(endpoint: &str) -> Result<Url, SearchGraphError> {
    let trimmed = endpoint.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| SearchGraphError::InvalidConfig(format!("endpoint '{trimmed}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SearchGraphError::InvalidConfig(format!(
            "endpoint '{trimmed}' must use http or https, not {other}"
        ))),
    }
}
