// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   fetch-pool <URL_FILE> <WORKERS> [TIMEOUT_SECONDS] [--json] [--report-failures]
//
// The positional arguments follow the classic "file, workers, timeout"
// order. Everything clap can validate (numbers, ranges) is validated here,
// so the rest of the program never sees a bad worker count.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::pool::PoolSettings;
use crate::report::ReportFormat;

/// Timeout used when the third positional argument is omitted.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(
    name = "fetch-pool",
    version = "0.1.0",
    about = "Fetch every URL in a file with a fixed pool of workers",
    long_about = "fetch-pool reads one URL per line, fetches each with an HTTP GET bounded by a \
                  per-request timeout, and reports success, HTTP error or timeout for every URL."
)]
pub struct Cli {
    /// Text file with one URL per line
    pub url_file: PathBuf,

    /// Number of concurrent workers
    ///
    /// This is also the capacity of the work queue, so it bounds how many
    /// URLs are read ahead of the workers. With 0 workers nothing is fetched.
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Print each result as a JSON line on stdout instead of a log line
    #[arg(long)]
    pub json: bool,

    /// Report connection, DNS and malformed-URL failures as results
    /// instead of only logging them
    #[arg(long)]
    pub report_failures: bool,

    /// Show debug output (worker start/stop, queue shutdown)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the pool configuration from the parsed arguments.
    pub fn settings(&self) -> PoolSettings {
        PoolSettings {
            workers: self.workers,
            timeout: Duration::from_secs(self.timeout_seconds),
            report_failures: self.report_failures,
        }
    }

    pub fn report_format(&self) -> ReportFormat {
        if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Log
        }
    }
}
