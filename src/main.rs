// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Open the URL file (a bad file stops us before any request is made)
// 4. Run the worker pool and report each result as it arrives
// 5. Exit with proper code (0 = all URLs processed, 2 = startup error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;           // src/cli.rs - command-line parsing
mod error;         // src/error.rs - per-request error type
mod pool;          // src/pool/ - producer, workers, coordinator, collector
mod report;        // src/report.rs - result output
mod source;        // src/source/ - where URLs come from

#[cfg(test)]
mod fixture;       // src/fixture.rs - local HTTP server for tests

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use futures::Stream;
use std::path::Path;
use report::Reporter;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    // Invalid arguments print usage and exit with code 2 right here
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = cli.settings();
    let urls = open_urls(&cli.url_file).await?;

    // One client for every worker, so connections get reused
    let client = reqwest::Client::builder()
        .build()
        .context("failed to create HTTP client")?;

    let mut reporter = Reporter::new(cli.report_format());
    let summary = pool::run(urls, &settings, client, |record| {
        if let Err(e) = reporter.emit(record) {
            warn!(url = %record.url, error = %e, "failed to report result");
        }
    })
    .await;

    reporter.finish(&summary)?;
    Ok(0)
}

/// Opens the URL file; failing here ends the program before any request.
async fn open_urls(path: &Path) -> Result<impl Stream<Item = String> + Send + 'static> {
    source::open_url_file(path)
        .await
        .with_context(|| format!("error while opening file: {}", path.display()))
}

/// Logs go to stderr. RUST_LOG wins; otherwise `info`, or `debug` with -v.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
