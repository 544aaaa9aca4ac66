//! Wire types for search-graph requests, responses and execution info.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which search-graph flavour the service should run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    /// Single search pass followed by schema extraction.
    #[default]
    Search,
    /// Search across text and images before extraction.
    OmniSearch,
}

impl GraphKind {
    /// Path of the endpoint serving this graph, relative to the service root.
    #[must_use]
    pub const fn endpoint_path(self) -> &'static str {
        match self {
            Self::Search => "v1/search-graph",
            Self::OmniSearch => "v1/omni-search-graph",
        }
    }
}

/// Non-secret options for a single graph invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOptions {
    /// Model identifier passed through to the LLM provider.
    pub model: String,
    /// Completion-token cap for this invocation.
    pub max_tokens: u64,
    /// Number of search results the graph should consider.
    pub max_results: u32,
    /// Whether page fetching runs a headless browser.
    pub headless: bool,
    /// Ask the service for verbose execution.
    pub verbose: bool,
}

/// LLM section of the request body.
#[derive(Clone, Serialize)]
pub struct LlmConfig {
    /// Model identifier.
    pub model: String,
    /// Provider API key.
    pub api_key: String,
    /// Completion-token cap.
    pub max_tokens: u64,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Search section of the request body.
#[derive(Clone, Serialize)]
pub struct SearchConfig {
    /// Search provider API key.
    pub api_key: String,
    /// Number of results to fetch.
    pub max_results: u32,
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &"<redacted>")
            .field("max_results", &self.max_results)
            .finish()
    }
}

/// Graph configuration block of the request body.
#[derive(Debug, Clone, Serialize)]
pub struct GraphConfig {
    /// LLM settings.
    pub llm: LlmConfig,
    /// Search settings.
    pub search: SearchConfig,
    /// Headless page fetching.
    pub headless: bool,
    /// Verbose execution.
    pub verbose: bool,
}

/// Full request body sent to the service.
#[derive(Debug, Clone, Serialize)]
pub struct GraphRequest {
    /// Natural-language extraction prompt.
    pub prompt: String,
    /// JSON schema the extracted record must follow.
    pub schema: Value,
    /// Graph configuration.
    pub config: GraphConfig,
}

/// Execution info reported for one node of the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeExecInfo {
    /// Name of the graph node.
    pub node_name: String,
    /// Total tokens consumed by the node.
    #[serde(default)]
    pub total_tokens: u64,
    /// Prompt tokens consumed by the node.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Completion tokens produced by the node.
    #[serde(default)]
    pub completion_tokens: u64,
    /// Successful LLM requests issued by the node.
    #[serde(default)]
    pub successful_requests: u64,
    /// Cost in USD attributed to the node.
    #[serde(default, alias = "total_cost_USD")]
    pub total_cost_usd: f64,
    /// Execution time in seconds.
    #[serde(default)]
    pub exec_time: f64,
}

/// Decoded response from a successful graph run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphResponse {
    /// The extracted record, unwrapped from any `result` envelope.
    pub result: Value,
    /// Per-node execution info, if the service reported it.
    pub exec_info: Vec<NodeExecInfo>,
}
