//! Apartment Scout — Binary Entrypoint
//! One batch run: pull every configured source, select the matches, write
//! the report files and (optionally) send the summary email.
//!
//! See `README.md` for quickstart and configuration.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use apartment_scout::config::ScoutConfig;
use apartment_scout::ingest::{build_providers, collect_listings};
use apartment_scout::notify::EmailNotifier;
use apartment_scout::pipeline::select_matches;
use apartment_scout::report::write_reports;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = ScoutConfig::load_default().context("loading configuration")?;

    let (sources, skipped_sources) = build_providers(&cfg.sources);
    let (listings, fetch_errors) = collect_listings(&sources).await;
    let source_errors = skipped_sources + fetch_errors;
    let matches = select_matches(listings, &cfg.filters);

    write_reports(&matches, &cfg.output)?;
    tracing::info!(
        matches = matches.len(),
        source_errors,
        csv = %cfg.output.csv,
        markdown = %cfg.output.markdown_summary,
        "run complete"
    );

    if !matches.is_empty() || cfg.email.send_if_zero {
        if let Some(notifier) = EmailNotifier::from_env(&cfg.email) {
            notifier.notify(&matches, &cfg.filters.keywords).await;
        }
    }

    Ok(())
}
