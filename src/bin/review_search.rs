//! `review-search`: runs one cross-platform review search and prints the
//! ranked results as JSON.
//!
//! API keys are read from `GOOGLE_PLACES_API_KEY`, `YELP_API_KEY` and
//! `TRIPADVISOR_API_KEY`; service settings from `REVIEW_IMPORT__*`.
//! Logs go to stderr so stdout stays valid JSON.

use anyhow::{Context, Result, bail};
use clap::Parser;
use review_import::application::services::{ReviewImportService, TestimonialImportService};
use review_import::config::{EnvSecretProvider, PlatformCredentials, ServiceConfig};
use review_import::infrastructure::persistence::InMemoryTestimonialRepository;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Search Google Places, Yelp and TripAdvisor for a business and rank the
/// places by rating and review count.
#[derive(Debug, Parser)]
#[command(name = "review-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Search query, e.g. "coffee shop portland"
    #[arg(required = true)]
    query: Vec<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Print the full search report, including per-platform failures
    #[arg(long)]
    report: bool,

    /// Import a review as a testimonial: <result index>:<review index>
    #[arg(long, value_name = "RESULT:REVIEW", value_parser = parse_import_target)]
    import: Option<(usize, usize)>,
}

fn parse_import_target(value: &str) -> Result<(usize, usize), String> {
    let (result, review) = value
        .split_once(':')
        .ok_or_else(|| format!("expected <result>:<review>, got {value:?}"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid index {s:?}: {e}"))
    };
    Ok((parse(result)?, parse(review)?))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = ServiceConfig::from_env().context("failed to load configuration")?;
    let credentials = PlatformCredentials::from_provider(&EnvSecretProvider::load());
    let service = ReviewImportService::from_credentials(&credentials, &config)
        .context("failed to build review import service")?;
    let _sweeper = service.start_cache_cleanup(config.cleanup_interval());

    let query = cli.query.join(" ");
    info!(
        query = %query,
        platforms = ?service.active_platforms(),
        "searching"
    );
    let report = service
        .search_with_report(&query)
        .await
        .with_context(|| format!("search for {query:?} failed"))?;

    if cli.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&report.results)?);
    }

    if let Some((result_index, review_index)) = cli.import {
        let Some(result) = report.results.get(result_index) else {
            bail!(
                "result index {result_index} is out of range ({} results)",
                report.results.len()
            );
        };
        let importer = TestimonialImportService::new(Arc::new(InMemoryTestimonialRepository::new()));
        let testimonial = importer
            .import_from_result(result, review_index)
            .await
            .context("failed to import review")?;
        println!("{}", serde_json::to_string_pretty(&testimonial)?);
    }

    Ok(())
}
