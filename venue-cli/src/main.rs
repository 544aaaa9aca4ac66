//! The venue-enrich binary runs one bounded enrichment against a search graph.

mod cli;
mod errors;

use clap::Parser;
use search_graph_adapter::{prettify_exec_info, Credentials, SearchGraphClient};
use tracing_subscriber::EnvFilter;
use venue_enrichment::{BoundedRetryRunner, JsonFileSink, RunReport, SchemaVariant};

use crate::cli::{Cli, Commands, RunArgs};
use crate::errors::CliError;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run(args) => run_enrichment(args, cli.verbose).await,
        Commands::Schema { schema } => {
            let schema = SchemaVariant::from(schema).target_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

async fn run_enrichment(args: RunArgs, verbose: bool) -> Result<(), CliError> {
    let settings = args.into_settings(verbose)?;

    // Secrets are resolved before any request is built.
    let credentials = Credentials::from_env()?;
    let client = SearchGraphClient::new(&settings.endpoint, credentials, settings.request_timeout)?;

    tracing::info!(
        endpoint = %client.base_url(),
        graph = ?settings.request.graph,
        output = %settings.output.display(),
        "Starting venue enrichment..."
    );

    let runner = BoundedRetryRunner::new(
        client,
        JsonFileSink::new(settings.output.clone()),
        settings.limits.clone(),
    );

    match runner.run(&settings.request).await {
        Ok(report) => print_success(&report),
        Err(err) => println!("\n[{}] {err}", err.category()),
    }

    Ok(())
}

fn print_success(report: &RunReport) {
    let table = prettify_exec_info(&report.exec_info);
    if !table.is_empty() {
        println!("{table}");
    }

    if let Some(extras) = &report.venue.extras {
        tracing::info!(
            capacity = extras.capacity.as_deref().unwrap_or(""),
            genres = %extras.genres.join(", "),
            address = extras.address.as_deref().unwrap_or(""),
            "extended fields (not persisted)"
        );
    }

    println!(
        "\n[SUCCESS] Venue '{}' written to {} after {} attempt(s), {} tokens budgeted.",
        report.venue.record.name,
        report.location,
        report.metrics.total_attempts,
        report.state.tokens_used,
    );
}
