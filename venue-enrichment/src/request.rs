//! The immutable request issued for every attempt of a run.

use search_graph_adapter::GraphKind;
use serde_json::Value;

use crate::config::ModelConfig;
use crate::schema::SchemaVariant;

/// The venue a run is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueQuery {
    /// Venue name, e.g. "The Anthem".
    pub venue_name: String,
    /// City or region, e.g. "Washington DC".
    pub location: String,
}

impl VenueQuery {
    /// Creates a query for `venue_name` in `location`.
    #[must_use]
    pub fn new(venue_name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            venue_name: venue_name.into(),
            location: location.into(),
        }
    }

    /// Default prompt asking the graph about this venue.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "tell me everything about the venue {} in {}",
            self.venue_name, self.location
        )
    }
}

/// Everything sent to the service for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    /// Natural-language prompt.
    pub prompt: String,
    /// JSON schema the service must fill.
    pub target_schema: Value,
    /// Schema variant the target schema was generated from.
    pub variant: SchemaVariant,
    /// Model and search settings.
    pub model: ModelConfig,
    /// Graph flavour to run.
    pub graph: GraphKind,
    /// Ask the service for verbose execution.
    pub verbose: bool,
}

impl ExtractionRequest {
    /// Builds the request for `query`, generating the schema for `variant`.
    #[must_use]
    pub fn for_venue(query: &VenueQuery, variant: SchemaVariant, model: ModelConfig) -> Self {
        Self {
            prompt: query.prompt(),
            target_schema: variant.target_schema(),
            variant,
            model,
            graph: GraphKind::default(),
            verbose: false,
        }
    }

    /// Replace the generated prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Select the graph flavour.
    #[must_use]
    pub const fn with_graph(mut self, graph: GraphKind) -> Self {
        self.graph = graph;
        self
    }

    /// Request verbose execution.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_venue_and_location() {
        let query = VenueQuery::new("The Anthem", "Washington DC");
        assert_eq!(
            query.prompt(),
            "tell me everything about the venue The Anthem in Washington DC"
        );
    }

    #[test]
    fn test_request_carries_variant_schema() {
        let query = VenueQuery::new("The Anthem", "Washington DC");
        let request = ExtractionRequest::for_venue(&query, SchemaVariant::Extended, ModelConfig::default())
            .with_graph(GraphKind::OmniSearch);
        assert_eq!(request.graph, GraphKind::OmniSearch);
        assert!(request.target_schema["properties"].get("genres").is_some());
        assert_eq!(request.model.model_name, "gpt-4-turbo");
    }
}
