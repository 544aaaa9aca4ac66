//! # venue-enrichment
//!
//! Enriches a music venue record through a remote search-graph service.
//!
//! - [`BoundedRetryRunner`] - Retry loop with token budget, backoff and deadline
//! - [`RunLimits`] / [`ModelConfig`] - Run configuration
//! - [`RunError`] - Terminal outcomes with the run state attached
//! - [`VenueRecord`] / [`project`] - The persisted schema and projection onto it
//! - [`ExtractionService`] / [`RecordSink`] - Seams for the service and the output
//!
//! ## Example
//!
//! ```no_run
//! # use std::time::Duration;
//! # use search_graph_adapter::{Credentials, SearchGraphClient};
//! # use venue_enrichment::*;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SearchGraphClient::new(
//!     "http://localhost:8000",
//!     Credentials::from_env()?,
//!     Duration::from_secs(600),
//! )?;
//! let runner = BoundedRetryRunner::new(client, JsonFileSink::new("search_g.json"), RunLimits::default());
//!
//! let query = VenueQuery::new("The Anthem", "Washington DC");
//! let request = ExtractionRequest::for_venue(&query, SchemaVariant::Basic, ModelConfig::default());
//! let report = runner.run(&request).await?;
//! println!("{}", report.venue.record.name);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod request;
pub mod runner;
pub mod schema;
pub mod service;
pub mod sink;
pub mod validation;

pub use config::{ModelConfig, RunLimits};
pub use error::{AttemptOutcome, AttemptRecord, RunError};
pub use metrics::{estimate_tokens, RunMetrics, RunState};
pub use request::{ExtractionRequest, VenueQuery};
pub use runner::{BoundedRetryRunner, RunReport};
pub use schema::{project, ProjectedVenue, SchemaVariant, VenueExtras, VenueRecord};
pub use service::{ExtractionResponse, ExtractionService, ServiceError};
pub use sink::{JsonFileSink, RecordSink};
