//! Command-line surface and its translation into run settings.

use clap::{Args, Parser, Subcommand, ValueEnum};
use search_graph_adapter::{GraphKind, DEFAULT_ENDPOINT, ENDPOINT_ENV_VAR};
use std::path::PathBuf;
use std::time::Duration;
use venue_enrichment::{ExtractionRequest, ModelConfig, RunLimits, SchemaVariant, VenueQuery};

use crate::errors::CliError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enrich one venue and write the record as JSON
    Run(RunArgs),
    /// Print the JSON schema sent to the search graph
    Schema {
        /// Schema variant to print
        #[arg(long, value_enum, default_value_t = SchemaArg::Basic)]
        schema: SchemaArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphArg {
    /// Search graph
    Search,
    /// Omni search graph
    Omni,
}

impl From<GraphArg> for GraphKind {
    fn from(arg: GraphArg) -> Self {
        match arg {
            GraphArg::Search => Self::Search,
            GraphArg::Omni => Self::OmniSearch,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaArg {
    /// The ten persisted fields
    Basic,
    /// Also request capacity, genres and address
    Extended,
}

impl From<SchemaArg> for SchemaVariant {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Basic => Self::Basic,
            SchemaArg::Extended => Self::Extended,
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Venue name, e.g. "The Anthem"
    #[arg(long, env = "VENUE_NAME")]
    pub venue: String,

    /// Venue location, e.g. "Washington DC"
    #[arg(long, env = "VENUE_LOCATION")]
    pub location: String,

    /// Replace the generated prompt
    #[arg(long)]
    pub prompt: Option<String>,

    /// Search graph flavour
    #[arg(long, value_enum, default_value_t = GraphArg::Search)]
    pub graph: GraphArg,

    /// Schema variant requested from the graph
    #[arg(long, value_enum, default_value_t = SchemaArg::Basic)]
    pub schema: SchemaArg,

    /// Output file (default: search_g.json or omni.json by graph)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Model identifier
    #[arg(long, env = "VENUE_MODEL", default_value = "gpt-4-turbo")]
    pub model: String,

    /// Search results the graph considers
    #[arg(long, default_value_t = 10)]
    pub max_results: u32,

    /// Fetch pages with a headless browser
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub headless: bool,

    /// Search graph service root
    #[arg(long, env = ENDPOINT_ENV_VAR, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Timeout for one HTTP exchange, in seconds
    #[arg(long, default_value_t = 600)]
    pub request_timeout_secs: u64,

    /// Tokens the whole run may request
    #[arg(long, default_value_t = 10_900)]
    pub total_token_limit: u64,

    /// Completion-token cap per attempt
    #[arg(long, default_value_t = 1_500)]
    pub per_attempt_token_limit: u64,

    /// Rate-limit retries before giving up
    #[arg(long, default_value_t = 5)]
    pub max_retries: u32,

    /// Wall-clock budget, checked before each attempt, in seconds
    #[arg(long, default_value_t = 300)]
    pub max_wall_clock_secs: u64,

    /// Exponential backoff base
    #[arg(long, default_value_t = 2.0)]
    pub backoff_base: f64,

    /// Backoff unit in seconds
    #[arg(long, default_value_t = 1.0)]
    pub initial_wait_secs: f64,

    /// Longest single backoff wait, in seconds
    #[arg(long, default_value_t = 300)]
    pub max_backoff_secs: u64,

    /// Smallest budget worth sending
    #[arg(long, default_value_t = 1)]
    pub min_attempt_tokens: u64,
}

/// Everything the binary needs to wire up a run.
#[derive(Debug)]
pub struct Settings {
    pub request: ExtractionRequest,
    pub limits: RunLimits,
    pub output: PathBuf,
    pub endpoint: String,
    pub request_timeout: Duration,
}

impl RunArgs {
    /// Translates the parsed flags into run settings.
    pub fn into_settings(self, verbose: bool) -> Result<Settings, CliError> {
        if self.venue.trim().is_empty() || self.location.trim().is_empty() {
            return Err(CliError::Config(
                "venue and location must not be empty".to_string(),
            ));
        }
        let initial_wait = Duration::try_from_secs_f64(self.initial_wait_secs).map_err(|_| {
            CliError::Config(format!(
                "initial wait must be a non-negative number of seconds, got {}",
                self.initial_wait_secs
            ))
        })?;

        let limits = RunLimits::default()
            .with_total_token_limit(self.total_token_limit)
            .with_per_attempt_token_limit(self.per_attempt_token_limit)
            .with_max_retries(self.max_retries)
            .with_max_wall_clock(Duration::from_secs(self.max_wall_clock_secs))
            .with_backoff(self.backoff_base, initial_wait)
            .with_max_backoff(Duration::from_secs(self.max_backoff_secs))
            .with_min_attempt_tokens(self.min_attempt_tokens);
        limits.validate()?;

        let model = ModelConfig {
            max_completion_tokens: self.per_attempt_token_limit,
            ..ModelConfig::default()
        }
        .with_model(self.model)
        .with_max_results(self.max_results)
        .with_headless(self.headless);

        let graph = GraphKind::from(self.graph);
        let query = VenueQuery::new(self.venue.trim(), self.location.trim());
        let mut request = ExtractionRequest::for_venue(&query, self.schema.into(), model)
            .with_graph(graph)
            .with_verbose(verbose);
        if let Some(prompt) = self.prompt {
            request = request.with_prompt(prompt);
        }

        Ok(Settings {
            request,
            limits,
            output: self.output.unwrap_or_else(|| default_output(graph)),
            endpoint: self.endpoint,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}

fn default_output(graph: GraphKind) -> PathBuf {
    match graph {
        GraphKind::Search => PathBuf::from("search_g.json"),
        GraphKind::OmniSearch => PathBuf::from("omni.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["venue-enrich"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn run_args(cli: Cli) -> RunArgs {
        match cli.command {
            Commands::Run(args) => args,
            Commands::Schema { .. } => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn test_defaults_match_documented_limits() {
        let cli = parse(&["run", "--venue", "The Anthem", "--location", "Washington DC"]);
        let settings = run_args(cli).into_settings(false).unwrap();

        assert_eq!(settings.limits, RunLimits::default());
        assert_eq!(settings.output, PathBuf::from("search_g.json"));
        assert_eq!(settings.request_timeout, Duration::from_secs(600));
        assert_eq!(settings.request.graph, GraphKind::Search);
        assert_eq!(
            settings.request.prompt,
            "tell me everything about the venue The Anthem in Washington DC"
        );
        assert_eq!(settings.request.model.model_name, "gpt-4-turbo");
        assert_eq!(settings.request.model.max_results, 10);
        assert!(settings.request.model.headless);
    }

    #[test]
    fn test_omni_graph_defaults_to_omni_output() {
        let cli = parse(&[
            "run", "--venue", "9:30 Club", "--location", "Washington DC", "--graph", "omni",
            "--schema", "extended", "--headless", "false",
        ]);
        let settings = run_args(cli).into_settings(true).unwrap();

        assert_eq!(settings.output, PathBuf::from("omni.json"));
        assert_eq!(settings.request.graph, GraphKind::OmniSearch);
        assert_eq!(settings.request.variant, SchemaVariant::Extended);
        assert!(!settings.request.model.headless);
        assert!(settings.request.verbose);
    }

    #[test]
    fn test_limit_flags_are_applied() {
        let cli = parse(&[
            "run", "--venue", "v", "--location", "l", "--total-token-limit", "4000",
            "--per-attempt-token-limit", "800", "--max-retries", "2", "--initial-wait-secs", "0.5",
            "--backoff-base", "3", "--prompt", "custom prompt", "-o", "out/venue.json",
        ]);
        let settings = run_args(cli).into_settings(false).unwrap();

        assert_eq!(settings.limits.total_token_limit, 4_000);
        assert_eq!(settings.limits.per_attempt_token_limit, 800);
        assert_eq!(settings.limits.max_retries, 2);
        assert_eq!(settings.limits.initial_wait, Duration::from_millis(500));
        assert_eq!(settings.limits.backoff_delay(1), Duration::from_millis(1_500));
        assert_eq!(settings.request.model.max_completion_tokens, 800);
        assert_eq!(settings.request.prompt, "custom prompt");
        assert_eq!(settings.output, PathBuf::from("out/venue.json"));
    }

    #[test]
    fn test_invalid_limits_fail_before_any_request() {
        let cli = parse(&["run", "--venue", "v", "--location", "l", "--per-attempt-token-limit", "0"]);
        let err = run_args(cli).into_settings(false).unwrap_err();
        assert!(matches!(err, CliError::Run(_)));

        let cli = parse(&["run", "--venue", "v", "--location", "l", "--initial-wait-secs=-1"]);
        let err = run_args(cli).into_settings(false).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_blank_venue_is_rejected() {
        let cli = parse(&["run", "--venue", "  ", "--location", "Washington DC"]);
        assert!(matches!(run_args(cli).into_settings(false), Err(CliError::Config(_))));
    }

    #[test]
    fn test_schema_subcommand_parses_variant() {
        let cli = parse(&["schema", "--schema", "extended"]);
        assert!(matches!(cli.command, Commands::Schema { schema: SchemaArg::Extended }));
    }
}
