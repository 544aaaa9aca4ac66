use search_graph_adapter::SearchGraphError;
use thiserror::Error;
use venue_enrichment::RunError;

/// Errors that abort the CLI before or outside a run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid command-line settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential or client setup failure from the adapter.
    #[error("Search graph setup failed: {0}")]
    SearchGraph(#[from] SearchGraphError),

    /// Run limits rejected before the run started.
    #[error("{0}")]
    Run(#[from] RunError),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
